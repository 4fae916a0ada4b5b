mod common;

use gacha::{Gacha, PoolType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gacha = Gacha::builder()
        .with_collector(common::get_collector().await?)
        .catalog(gacha_mock::MockCollector::catalog())
        .build()?;

    let session = gacha.collect().await?;
    println!(
        "account {} ({}, {}): {} records",
        session.subject_id(),
        session.region(),
        session.language(),
        session.len()
    );

    for pool in PoolType::ALL {
        let ledger = session.ledger(pool);
        println!(
            "\n## {} ({} draws, pity {}/{}, {} to guarantee)",
            ledger.display_name(),
            ledger.len(),
            ledger.current_pity(),
            ledger.ceiling(),
            ledger.remaining_to_ceiling()
        );
        for step in ledger.pity_progress().iter().filter(|s| s.record.rank.get() >= 4) {
            let featured = !ledger.pity_query(&step.record.name, Some(step.record.time)).is_empty();
            println!(
                " - #{:<4} pity {:<3} {} {}* {}{}",
                step.ordinal,
                step.pity,
                step.record.time,
                step.record.rank.get(),
                step.record.name,
                if featured { " (featured)" } else { "" }
            );
        }
    }
    Ok(())
}
