use std::time::Duration;

use gacha::{FetchStrategy, Gacha, GachaConfig, GachaError, MergeConfig, MergePolicy};

use crate::helpers::mock;

#[test]
fn build_requires_a_collector() {
    let err = Gacha::builder().build().err().expect("must fail");
    assert!(matches!(err, GachaError::InvalidArg(_)));
}

#[test]
fn build_rejects_zero_timeouts() {
    let err = Gacha::builder()
        .with_collector(mock())
        .collector_timeout(Duration::ZERO)
        .build()
        .err()
        .expect("must fail");
    assert!(matches!(err, GachaError::InvalidArg(_)));

    let err = Gacha::builder()
        .with_collector(mock())
        .request_timeout(Duration::ZERO)
        .build()
        .err()
        .expect("must fail");
    assert!(matches!(err, GachaError::InvalidArg(_)));
}

#[test]
fn builder_setters_land_in_config() {
    let merge = MergeConfig {
        language: MergePolicy::Overwrite,
        ..MergeConfig::default()
    };
    let g = Gacha::builder()
        .with_collector(mock())
        .merge_config(merge)
        .fetch_strategy(FetchStrategy::FirstOnly)
        .collector_timeout(Duration::from_secs(7))
        .request_timeout(Duration::from_secs(9))
        .build()
        .unwrap();
    let cfg = g.config();
    assert_eq!(cfg.merge, merge);
    assert_eq!(cfg.fetch_strategy, FetchStrategy::FirstOnly);
    assert_eq!(cfg.collector_timeout, Duration::from_secs(7));
    assert_eq!(cfg.request_timeout, Some(Duration::from_secs(9)));
    assert!(g.catalog().is_empty());
}

#[test]
fn whole_config_can_be_replaced() {
    let cfg = GachaConfig {
        merge: MergeConfig::uniform(MergePolicy::Keep),
        ..GachaConfig::default()
    };
    let g = Gacha::builder()
        .with_collector(mock())
        .config(cfg.clone())
        .build()
        .unwrap();
    assert_eq!(g.config().merge, cfg.merge);
    assert_eq!(g.new_session().config(), cfg.merge);
}
