use std::time::Duration;

use gacha::{FetchStrategy, GachaError, PoolType};
use gacha_mock::{DynamicMockCollector, MockBehavior};

use crate::helpers::{FIXTURE_RECORDS, SUBJECT, builder, fixture_profile, mock, mock_for};

#[tokio::test]
async fn falls_back_to_next_collector() {
    let g = builder()
        .with_collector(mock_for("FAIL"))
        .with_collector(mock())
        .build()
        .unwrap();
    let s = g.collect().await.unwrap();
    assert_eq!(s.len(), FIXTURE_RECORDS);
    assert_eq!(s.subject_id(), SUBJECT);
}

#[tokio::test]
async fn first_only_does_not_fall_back() {
    let g = builder()
        .with_collector(mock_for("FAIL"))
        .with_collector(mock())
        .fetch_strategy(FetchStrategy::FirstOnly)
        .build()
        .unwrap();
    match g.collect().await.unwrap_err() {
        GachaError::AllCollectorsFailed(es) => assert_eq!(es.len(), 1),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn all_failures_are_aggregated_in_order() {
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("dyn");
    ctl.set_profile_behavior(MockBehavior::Fail(GachaError::Data("bad profile".into())))
        .await;
    let g = builder()
        .with_collector(mock_for("FAIL"))
        .with_collector(dynamic)
        .build()
        .unwrap();
    let err = g.collect().await.unwrap_err();
    assert!(err.is_recoverable());
    let errs = err.flatten();
    assert_eq!(errs.len(), 2);
    assert!(matches!(&errs[0], GachaError::Collector { collector, .. } if collector == "gacha-mock"));
    // engine errors are tagged with the collector that produced them
    match &errs[1] {
        GachaError::Collector { collector, msg } => {
            assert_eq!(collector, "dyn");
            assert!(msg.contains("bad profile"), "{msg}");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn hanging_collector_times_out_and_falls_back() {
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("slow");
    ctl.set_profile_behavior(MockBehavior::Hang).await;
    let g = builder()
        .with_collector(dynamic)
        .with_collector(mock())
        .collector_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let s = g.collect().await.unwrap();
    assert_eq!(s.len(), FIXTURE_RECORDS);
}

#[tokio::test]
async fn lone_timeout_is_reported() {
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("slow");
    ctl.set_profile_behavior(MockBehavior::Hang).await;
    let g = builder()
        .with_collector(dynamic)
        .collector_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    match g.collect().await.unwrap_err() {
        GachaError::AllCollectorsFailed(es) => {
            assert_eq!(es, vec![GachaError::collector_timeout("slow")]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn request_deadline_bounds_the_whole_collect() {
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("slow");
    ctl.set_profile_behavior(MockBehavior::Hang).await;
    let g = builder()
        .with_collector(dynamic)
        .collector_timeout(Duration::from_secs(10))
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let err = g.collect().await.unwrap_err();
    assert!(matches!(err, GachaError::RequestTimeout { operation } if operation == "collect"));
}

#[tokio::test]
async fn failing_pool_abandons_the_collector() {
    let (dynamic, ctl) = DynamicMockCollector::new_with_controller("partial");
    ctl.set_profile_behavior(MockBehavior::Return(fixture_profile()))
        .await;
    ctl.set_pool_behavior(
        PoolType::CharacterEvent,
        MockBehavior::Fail(GachaError::collector("partial", "authkey timeout")),
    )
    .await;
    let g = builder()
        .with_collector(dynamic)
        .with_collector(mock())
        .build()
        .unwrap();
    let s = g.collect().await.unwrap();
    assert_eq!(s.len(), FIXTURE_RECORDS);
    assert_eq!(
        ctl.pool_requests().await,
        vec![PoolType::Beginner, PoolType::Standard, PoolType::CharacterEvent]
    );
}
