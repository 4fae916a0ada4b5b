use chrono::{TimeZone, Utc};
use gacha::{Gacha, PoolType, is_canonical};

use crate::helpers::{FIXTURE_RECORDS, SUBJECT, builder, mock};

#[tokio::test]
async fn collect_assembles_a_fresh_session() {
    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();

    assert_eq!(s.len(), FIXTURE_RECORDS);
    assert_eq!(s.subject_id(), SUBJECT);
    assert_eq!(s.region().as_str(), "cn_gf01");
    assert_eq!(s.language(), "en-us");
    assert!(s.created_at().is_some());
    assert_eq!(s.created_at(), s.modified_at());
    for ledger in s.ledgers() {
        assert!(is_canonical(ledger.records()), "{}", ledger.pool());
        assert_eq!(ledger.region().as_str(), "cn_gf01");
        assert_eq!(ledger.display_name(), ledger.pool().default_name());
    }
}

#[tokio::test]
async fn collected_records_are_oldest_first() {
    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();
    let ev = s.ledger(PoolType::CharacterEvent).records();
    assert_eq!(ev.first().unwrap().id.as_str(), "1601300000000000001");
    assert_eq!(ev.last().unwrap().name, "Sharpshooter's Oath");
}

#[tokio::test]
async fn collected_session_carries_the_catalog() {
    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();
    let ev = s.ledger(PoolType::CharacterEvent);
    let venti = ev.records().iter().find(|r| r.name == "Venti").unwrap();
    assert_eq!(ev.pity_query("Venti", Some(venti.time)).len(), 1);
    assert!(ev.pity_query("Klee", Some(venti.time)).is_empty());
}

#[test]
fn history_window_is_six_months() {
    let now = Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap();
    assert_eq!(
        Gacha::earliest_collectable(now).to_string(),
        "2021-01-03"
    );
}
