use gacha::{DumpOptions, GachaError, MergeConfig, MergePolicy, PoolType, Record};

use crate::helpers::{FIXTURE_RECORDS, OTHER_SUBJECT, SUBJECT, builder, mock, mock_for, raw};

#[tokio::test]
async fn save_then_load_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wishes.json");
    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();

    g.save(&s, &path, DumpOptions::default()).await.unwrap();
    let back = g.load(&path).await.unwrap();
    assert_eq!(back, s);
    assert!(!dir.path().join("wishes.json.tmp").exists());
}

#[tokio::test]
async fn redacted_save_omits_account_info() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.json");
    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();

    g.save(&s, &path, DumpOptions::redacted()).await.unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("\"infos\""));
    assert!(!text.contains(SUBJECT));

    let back = g.load(&path).await.unwrap();
    assert_eq!(back.len(), FIXTURE_RECORDS);
    assert_eq!(back.subject_id(), "");
}

#[tokio::test]
async fn load_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let g = builder().with_collector(mock()).build().unwrap();
    let err = g.load(dir.path().join("nope.json")).await.unwrap_err();
    assert!(matches!(err, GachaError::NotFound { .. }));
}

#[tokio::test]
async fn load_malformed_file_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let g = builder().with_collector(mock()).build().unwrap();
    let err = g.load(&path).await.unwrap_err();
    assert!(matches!(err, GachaError::Data(_)));
}

#[tokio::test]
async fn load_all_unions_exports_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let g = builder().with_collector(mock()).build().unwrap();

    let base = g.collect().await.unwrap();
    let mut newer = base.clone();
    newer.merge_records(
        PoolType::WeaponEvent,
        vec![Record::from(raw(
            SUBJECT,
            "1601400000000000002",
            "2020-10-04 08:00:00",
            "Slingshot",
            3,
        ))],
    );
    g.save(&base, &a, DumpOptions::default()).await.unwrap();
    g.save(&newer, &b, DumpOptions::default()).await.unwrap();

    let merged = g.load_all(&[&a, &b]).await.unwrap();
    assert_eq!(merged.len(), FIXTURE_RECORDS + 1);
    assert_eq!(merged.ledger(PoolType::WeaponEvent).len(), 2);
}

#[tokio::test]
async fn load_all_rejects_foreign_exports_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let mine = builder().with_collector(mock()).build().unwrap();
    let theirs = builder().with_collector(mock_for(OTHER_SUBJECT)).build().unwrap();
    mine.save(&mine.collect().await.unwrap(), &a, DumpOptions::default())
        .await
        .unwrap();
    theirs
        .save(&theirs.collect().await.unwrap(), &b, DumpOptions::default())
        .await
        .unwrap();

    let err = mine.load_all(&[&a, &b]).await.unwrap_err();
    assert!(matches!(err, GachaError::MergeConflict { .. }));

    let lenient = builder()
        .with_collector(mock())
        .merge_config(MergeConfig::uniform(MergePolicy::Overwrite))
        .build()
        .unwrap();
    let merged = lenient.load_all(&[&a, &b]).await.unwrap();
    assert_eq!(merged.subject_id(), OTHER_SUBJECT);
    // same fixture ids on both sides
    assert_eq!(merged.len(), FIXTURE_RECORDS);
}

#[tokio::test]
async fn load_all_needs_paths() {
    let g = builder().with_collector(mock()).build().unwrap();
    let none: [&str; 0] = [];
    let err = g.load_all(&none).await.unwrap_err();
    assert!(matches!(err, GachaError::InvalidArg(_)));
}

#[tokio::test]
async fn failed_save_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // a non-empty directory cannot be replaced by a file
    let target = dir.path().join("taken");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();

    let g = builder().with_collector(mock()).build().unwrap();
    let s = g.collect().await.unwrap();
    let err = g.save(&s, &target, DumpOptions::default()).await.unwrap_err();
    assert!(matches!(err, GachaError::Io(_)));
    assert!(!dir.path().join("taken.tmp").exists());
    assert!(target.join("keep").exists());
}
