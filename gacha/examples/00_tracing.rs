mod common;

use gacha::Gacha;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,gacha=trace,gacha_core=debug,gacha_remote=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let gacha = Gacha::builder()
        .with_collector(common::get_collector().await?)
        .build()?;
    let session = gacha.collect().await?;
    println!("collected {} records", session.len());
    Ok(())
}
