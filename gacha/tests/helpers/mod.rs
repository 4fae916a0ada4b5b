use std::sync::Arc;
use std::time::Duration;

use gacha::{
    CollectorProfile, DrawTime, Gacha, GachaBuilder, PoolType, Rank, RawDraw, RecordCollector,
    RecordId, Region,
};
use gacha_mock::MockCollector;

pub use gacha_mock::SUBJECT;

/// Records in the mock fixture history across all pools.
pub const FIXTURE_RECORDS: usize = 19;

/// A second account id for conflict tests.
pub const OTHER_SUBJECT: &str = "200000002";

pub fn mock() -> Arc<dyn RecordCollector> {
    Arc::new(MockCollector::new())
}

pub fn mock_for(subject: &str) -> Arc<dyn RecordCollector> {
    Arc::new(MockCollector::for_subject(subject))
}

/// Builder preloaded with the fixture catalog and short timeouts.
pub fn builder() -> GachaBuilder {
    Gacha::builder()
        .catalog(MockCollector::catalog())
        .collector_timeout(Duration::from_secs(5))
}

/// Profile identical to the one served by `MockCollector`.
pub fn fixture_profile() -> CollectorProfile {
    CollectorProfile {
        region: Region::from("cn_gf01"),
        language: "en-us".to_string(),
        pool_names: PoolType::ALL
            .into_iter()
            .map(|p| (p, p.default_name().to_string()))
            .collect(),
    }
}

pub fn raw(uid: &str, id: &str, time: &str, name: &str, rank: u8) -> RawDraw {
    RawDraw {
        uid: uid.to_string(),
        gacha_type: String::new(),
        item_id: String::new(),
        count: "1".to_string(),
        time: DrawTime::parse(time).unwrap(),
        name: name.to_string(),
        lang: "en-us".to_string(),
        item_type: "Weapon".to_string(),
        rank_type: Rank::new(rank),
        id: RecordId::new(id),
    }
}
