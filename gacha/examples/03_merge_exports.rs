use std::sync::Arc;

use gacha::{DumpOptions, Gacha, GachaError, Sha256Transform};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let Some(out) = args.pop() else {
        eprintln!("usage: 03_merge_exports <export.json>... <out.json>");
        return Ok(());
    };

    // Loading and merging needs no collector; the mock only satisfies the builder.
    let gacha = Gacha::builder()
        .with_collector(Arc::new(gacha_mock::MockCollector::new()))
        .build()?;

    let mut merged = match gacha.load_all(&args).await {
        Ok(s) => s,
        Err(e @ GachaError::MergeConflict { .. }) => {
            eprintln!("refusing to merge: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    merged.anonymize(&Sha256Transform);
    gacha.save(&merged, &out, DumpOptions::default()).await?;
    println!("{out}: {} records from {} exports", merged.len(), args.len());
    Ok(())
}
