use std::collections::BTreeMap;

use async_trait::async_trait;
use gacha_core::{
    CollectorProfile, GachaError, HistoryCatalog, PoolType, RawDraw, RecordCollector, Region,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockCollector, DynamicMockController, MockBehavior};
pub use fixtures::draws::SUBJECT;

/// Mock collector for CI-safe examples. Provides deterministic data from static fixtures.
///
/// The account id selects the behavior: `"FAIL"` makes every call fail and
/// `"TIMEOUT"` delays every call by 200ms. Any other id returns the fixture
/// history under that id.
pub struct MockCollector {
    subject: String,
}

impl Default for MockCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCollector {
    /// Collector for the default fixture account.
    #[must_use]
    pub fn new() -> Self {
        Self::for_subject(SUBJECT)
    }

    /// Collector returning the fixture history under `subject`.
    #[must_use]
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Featured-item catalog matching the fixture history.
    #[must_use]
    pub fn catalog() -> HistoryCatalog {
        fixtures::catalog::catalog()
    }

    async fn maybe_fail_or_timeout(&self, what: &'static str) -> Result<(), GachaError> {
        match self.subject.as_str() {
            "FAIL" => Err(GachaError::collector(
                "gacha-mock",
                format!("forced failure: {what}"),
            )),
            "TIMEOUT" => {
                // Keep short to avoid slowing tests excessively
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RecordCollector for MockCollector {
    fn name(&self) -> &'static str {
        "gacha-mock"
    }

    async fn profile(&self) -> Result<CollectorProfile, GachaError> {
        self.maybe_fail_or_timeout("profile").await?;
        Ok(CollectorProfile {
            region: Region::from("cn_gf01"),
            language: "en-us".to_string(),
            pool_names: PoolType::ALL
                .into_iter()
                .map(|p| (p, p.default_name().to_string()))
                .collect::<BTreeMap<_, _>>(),
        })
    }

    async fn collect_pool(&self, pool: PoolType) -> Result<Vec<RawDraw>, GachaError> {
        self.maybe_fail_or_timeout("collect_pool").await?;
        Ok(fixtures::draws::by_pool(&self.subject, pool))
    }
}
