use std::sync::Arc;

use gacha_core::{
    CatalogEntry, DrawTime, GachaError, HistoryCatalog, ItemType, LedgerPolicy, MergeField,
    MergePolicy, PoolLedger, PoolType, Rank, Record,
};
use serde_json::json;

fn t(s: &str) -> DrawTime {
    DrawTime::parse(s).unwrap()
}

fn rec(id: &str, time: &str, name: &str, item_type: &str, rank: u8) -> Record {
    Record::new(id, t(time), name, item_type, Rank::new(rank))
}

fn ledger(pool: PoolType, region: &str, policy: MergePolicy) -> PoolLedger {
    PoolLedger::new(pool)
        .with_region(region)
        .with_policy(LedgerPolicy {
            region: policy,
            display_name: MergePolicy::Overwrite,
        })
}

#[test]
fn region_reject_leaves_ledger_untouched() {
    let mut ours = ledger(PoolType::Standard, "cn_gf01", MergePolicy::Reject)
        .with_records(vec![rec("1", "2021-01-01 00:00:01", "Slingshot", "Weapon", 3)]);
    let theirs = ledger(PoolType::Standard, "os_usa", MergePolicy::Reject)
        .with_records(vec![rec("2", "2021-01-01 00:00:02", "Slingshot", "Weapon", 3)]);
    let before = ours.clone();

    let err = ours.merge(theirs).unwrap_err();
    match err {
        GachaError::MergeConflict {
            field,
            pool,
            ours: a,
            theirs: b,
        } => {
            assert_eq!(field, MergeField::Region);
            assert_eq!(pool, Some(PoolType::Standard));
            assert_eq!(a, "cn_gf01");
            assert_eq!(b, "os_usa");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(ours, before);
    assert_eq!(ours.len(), 1);
}

#[test]
fn region_overwrite_adopts_and_keep_retains() {
    let theirs = ledger(PoolType::Standard, "os_euro", MergePolicy::Reject);

    let mut ow = ledger(PoolType::Standard, "cn_gf01", MergePolicy::Overwrite);
    ow.merge(theirs.clone()).unwrap();
    assert_eq!(ow.region().as_str(), "os_euro");

    let mut keep = ledger(PoolType::Standard, "cn_gf01", MergePolicy::Keep);
    keep.merge(theirs).unwrap();
    assert_eq!(keep.region().as_str(), "cn_gf01");
}

#[test]
fn empty_region_is_a_region() {
    let mut ours = ledger(PoolType::Beginner, "", MergePolicy::Reject);
    let theirs = ledger(PoolType::Beginner, "cn_gf01", MergePolicy::Reject);
    assert!(ours.merge(theirs).is_err());
}

#[test]
fn bare_records_skip_policy() {
    let mut ours = ledger(PoolType::Standard, "cn_gf01", MergePolicy::Reject);
    ours.merge(vec![
        rec("2", "2021-01-01 00:00:02", "Slingshot", "Weapon", 3),
        rec("1", "2021-01-01 00:00:01", "Amber", "Character", 4),
    ])
    .unwrap();
    let ids: Vec<&str> = ours.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(ours.region().as_str(), "cn_gf01");
}

#[test]
fn different_pool_is_type_mismatch() {
    let mut ours = PoolLedger::new(PoolType::CharacterEvent);
    let theirs = PoolLedger::new(PoolType::WeaponEvent);
    let err = ours.merge(theirs).unwrap_err();
    assert!(matches!(err, GachaError::TypeMismatch { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn display_name_rules() {
    let named = |n: &str, p: MergePolicy| {
        PoolLedger::new(PoolType::CharacterEvent)
            .with_display_name(n)
            .with_policy(LedgerPolicy {
                region: MergePolicy::Reject,
                display_name: p,
            })
    };

    let merged = named("", MergePolicy::Reject)
        .merged(named("Character Event Wish", MergePolicy::Reject))
        .unwrap();
    assert_eq!(merged.display_name(), "Character Event Wish");

    let merged = named("Character Event Wish", MergePolicy::Reject)
        .merged(named("", MergePolicy::Reject))
        .unwrap();
    assert_eq!(merged.display_name(), "Character Event Wish");

    let merged = named("Character Event Wish", MergePolicy::Overwrite)
        .merged(named("角色活动祈愿", MergePolicy::Reject))
        .unwrap();
    assert_eq!(merged.display_name(), "角色活动祈愿");

    let merged = named("Character Event Wish", MergePolicy::Keep)
        .merged(named("角色活动祈愿", MergePolicy::Reject))
        .unwrap();
    assert_eq!(merged.display_name(), "Character Event Wish");

    let err = named("Character Event Wish", MergePolicy::Reject)
        .merged(named("角色活动祈愿", MergePolicy::Reject))
        .unwrap_err();
    assert!(matches!(
        err,
        GachaError::MergeConflict {
            field: MergeField::DisplayName,
            ..
        }
    ));
}

#[test]
fn check_merge_matches_merge() {
    let ours = ledger(PoolType::Standard, "cn_gf01", MergePolicy::Reject);
    assert!(ours.check_merge(&ledger(PoolType::Standard, "cn_gf01", MergePolicy::Keep)).is_ok());
    assert!(ours.check_merge(&ledger(PoolType::Standard, "os_asia", MergePolicy::Keep)).is_err());
}

#[test]
fn merge_returns_self_for_chaining() {
    let mut l = PoolLedger::new(PoolType::Standard);
    let len = l
        .merge(vec![rec("1", "2021-01-01 00:00:01", "Amber", "Character", 4)])
        .unwrap()
        .merge(vec![rec("2", "2021-01-01 00:00:02", "Amber", "Character", 4)])
        .unwrap()
        .len();
    assert_eq!(len, 2);
}

#[test]
fn grouping_keeps_first_record_of_each_group() {
    let l = PoolLedger::new(PoolType::Standard).with_records(vec![
        rec("1", "2021-01-01 10:00:00", "Amber", "Character", 4),
        rec("2", "2021-01-01 10:00:00", "Slingshot", "Weapon", 3),
        rec("3", "2021-01-01 11:00:00", "Slingshot", "Weapon", 3),
        rec("4", "2021-01-02 09:00:00", "Diluc", "Character", 5),
    ]);

    let by_time = l.group_by_exact_timestamp();
    assert_eq!(by_time.len(), 3);
    assert_eq!(by_time[&t("2021-01-01 10:00:00")].len(), 2);
    assert_eq!(by_time[&t("2021-01-01 11:00:00")].len(), 1);

    let by_day = l.group_by_day();
    let counts: Vec<usize> = by_day.values().map(Vec::len).collect();
    assert_eq!(counts, vec![3, 1]);

    let classified = l.group_by_classification();
    let weapons = &classified[&ItemType::Weapon][&Rank::new(3)];
    assert_eq!(weapons["Slingshot"].len(), 2);
    assert_eq!(classified[&ItemType::Character][&Rank::TOP]["Diluc"].len(), 1);
}

#[test]
fn italian_history_classifies() {
    let l = PoolLedger::new(PoolType::Standard).with_records(vec![
        rec("1", "2021-01-01 10:00:00", "Amber", "Personaggio", 4),
        rec("2", "2021-01-01 10:00:00", "Fionda", "Arma", 3),
    ]);
    let classified = l.group_by_classification();
    assert_eq!(classified[&ItemType::Character][&Rank::new(4)]["Amber"].len(), 1);
    assert_eq!(classified[&ItemType::Weapon][&Rank::new(3)]["Fionda"].len(), 1);
}

#[test]
fn classification_fails_closed() {
    let l = PoolLedger::new(PoolType::Standard).with_records(vec![
        rec("1", "2021-01-01 10:00:00", "Amber", "Character", 4),
        rec("2", "2021-01-01 10:00:01", "Mystery", "Artefact", 4),
    ]);
    assert!(l.group_by_classification().is_empty());

    let l = PoolLedger::new(PoolType::Standard)
        .with_records(vec![rec("1", "2021-01-01 10:00:00", "", "Weapon", 3)]);
    assert!(l.group_by_classification().is_empty());
}

fn catalog() -> HistoryCatalog {
    let histories = json!({
        "301": [
            {"time": ["2020-09-28 10:00:00", "2020-10-18 17:59:59"], "items": {"up": ["1022", "1014"]}},
            {"time": ["2020-10-20 18:00:00", "2020-11-10 15:59:59"], "items": {"up": ["1029", "1014"]}},
            {"time": ["2021-03-02 18:00:00", "2021-03-16 14:59:59"], "items": {"up": ["1022"]}}
        ]
    });
    let items = json!({
        "1022": {"zh-cn": "温迪", "en-us": "Venti"},
        "1029": {"zh-cn": "可莉", "en-us": "Klee"},
        "1014": {"zh-cn": "砂糖", "en-us": "Sucrose"}
    });
    HistoryCatalog::from_json(&histories, &items)
}

#[test]
fn pity_query_filters_by_window_and_name() {
    let cat = catalog();
    let l = PoolLedger::new(PoolType::CharacterEvent)
        .with_catalog(Arc::from(cat.entries(PoolType::CharacterEvent).to_vec()));

    assert_eq!(l.pity_query("Venti", None).len(), 2);
    assert_eq!(l.pity_query("温迪", Some(t("2020-10-01 00:00:00"))).len(), 1);
    assert!(l.pity_query("Venti", Some(t("2020-10-25 00:00:00"))).is_empty());
    // window bounds are inclusive
    assert_eq!(l.pity_query("Klee", Some(t("2020-11-10 15:59:59"))).len(), 1);
    assert_eq!(l.pity_query("Sucrose", None).len(), 2);
    assert!(l.pity_query("Nobody", None).is_empty());
}

#[test]
fn pity_query_without_catalog_is_empty() {
    let l = PoolLedger::new(PoolType::WeaponEvent);
    assert!(l.pity_query("Skyward Harp", None).is_empty());
}

#[test]
fn pity_query_ignores_foreign_pool_entries() {
    let foreign = CatalogEntry {
        pool: PoolType::WeaponEvent,
        window_start: t("2021-01-01 00:00:00"),
        window_end: t("2021-02-01 00:00:00"),
        featured: ["Amos' Bow".to_string()].into_iter().collect(),
    };
    let l = PoolLedger::new(PoolType::CharacterEvent).with_catalog(Arc::from(vec![foreign]));
    assert!(l.pity_query("Amos' Bow", None).is_empty());
}
