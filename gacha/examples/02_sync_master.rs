mod common;

use chrono::Utc;
use gacha::{DumpOptions, Gacha, MergeConfig, MergePolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let master = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gacha-master.json".to_string());

    // Display names follow the client language; let a language switch through.
    let gacha = Gacha::builder()
        .with_collector(common::get_collector().await?)
        .merge_config(MergeConfig {
            language: MergePolicy::Overwrite,
            ..MergeConfig::default()
        })
        .build()?;

    let session = gacha.sync(&master, DumpOptions::default()).await?;
    println!("{master}: {} records", session.len());
    println!(
        "draws before {} are no longer served remotely; keep syncing to preserve them",
        Gacha::earliest_collectable(Utc::now())
    );
    Ok(())
}
