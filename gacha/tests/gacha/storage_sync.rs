use gacha::{DumpOptions, GachaError, PoolType};
use gacha_mock::{DynamicMockCollector, MockBehavior};

use crate::helpers::{
    FIXTURE_RECORDS, OTHER_SUBJECT, SUBJECT, builder, fixture_profile, mock, mock_for, raw,
};

#[tokio::test]
async fn sync_creates_missing_master() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("master.json");
    let g = builder().with_collector(mock()).build().unwrap();

    let s = g.sync(&master, DumpOptions::default()).await.unwrap();
    assert_eq!(s.len(), FIXTURE_RECORDS);
    assert_eq!(g.load(&master).await.unwrap(), s);
}

#[tokio::test]
async fn sync_keeps_draws_that_left_the_remote_window() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("master.json");
    let full = builder().with_collector(mock()).build().unwrap();
    full.sync(&master, DumpOptions::default()).await.unwrap();

    // the remote now only serves one newer draw
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("recent");
    ctl.set_profile_behavior(MockBehavior::Return(fixture_profile()))
        .await;
    ctl.set_pool_behavior(
        PoolType::Standard,
        MockBehavior::Return(vec![raw(
            SUBJECT,
            "1606000000000000001",
            "2021-03-01 10:00:00",
            "Skyward Harp",
            5,
        )]),
    )
    .await;
    let recent = builder().with_collector(dynamic).build().unwrap();

    let s = recent.sync(&master, DumpOptions::default()).await.unwrap();
    assert_eq!(s.len(), FIXTURE_RECORDS + 1);
    assert_eq!(s.subject_id(), SUBJECT);
    let standard = s.ledger(PoolType::Standard).records();
    assert_eq!(standard.last().unwrap().name, "Skyward Harp");
    assert_eq!(recent.load(&master).await.unwrap(), s);
}

#[tokio::test]
async fn sync_conflict_leaves_master_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("master.json");
    let g = builder().with_collector(mock()).build().unwrap();
    g.sync(&master, DumpOptions::default()).await.unwrap();
    let before = std::fs::read_to_string(&master).unwrap();

    let other = builder().with_collector(mock_for(OTHER_SUBJECT)).build().unwrap();
    let err = other.sync(&master, DumpOptions::default()).await.unwrap_err();
    assert!(matches!(err, GachaError::MergeConflict { .. }));
    assert_eq!(std::fs::read_to_string(&master).unwrap(), before);
}

#[tokio::test]
async fn sync_collect_failure_leaves_master_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("master.json");
    let failing = builder().with_collector(mock_for("FAIL")).build().unwrap();
    let err = failing.sync(&master, DumpOptions::default()).await.unwrap_err();
    assert!(matches!(err, GachaError::AllCollectorsFailed(_)));
    assert!(!master.exists());
}
