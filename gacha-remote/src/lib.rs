//! gacha-remote
//!
//! Collector that implements `RecordCollector` on top of the game's wish
//! history HTTP API. The credentials come from the history page URL that the
//! game client writes into its log file.
#![warn(missing_docs)]

/// HTTP adapter trait and the production adapter backed by `reqwest`.
pub mod adapter;
/// Builder for `RemoteCollector`.
pub mod builder;
/// Game log discovery and URL extraction.
pub mod logfile;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use adapter::{GachaApi, PageRequest};
use async_trait::async_trait;
use gacha_core::{CollectorProfile, GachaError, PoolType, RawDraw, RecordCollector};
use logfile::AuthQuery;
use rand::Rng;

pub use builder::RemoteCollectorBuilder;

/// Largest page the API serves.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Public collector type. Construct with `RemoteCollector::builder()`.
pub struct RemoteCollector {
    api: Arc<dyn GachaApi>,
    query: AuthQuery,
    page_size: u32,
    max_jitter: Duration,
}

impl RemoteCollector {
    /// Static collector name used in logs and errors.
    pub const NAME: &'static str = "gacha-remote";

    /// Build from an adapter and an already extracted query.
    #[must_use]
    pub fn from_adapter(api: Arc<dyn GachaApi>, query: AuthQuery) -> Self {
        Self {
            api,
            query,
            page_size: MAX_PAGE_SIZE,
            max_jitter: Duration::from_secs(2),
        }
    }

    /// Returns a builder that reads the game log unless told otherwise.
    #[must_use]
    pub fn builder() -> RemoteCollectorBuilder {
        RemoteCollectorBuilder::default()
    }

    /// Query replayed on every request.
    #[must_use]
    pub const fn query(&self) -> &AuthQuery {
        &self.query
    }

    pub(crate) fn set_paging(&mut self, page_size: u32, max_jitter: Duration) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.max_jitter = max_jitter;
    }

    async fn pause(&self) {
        if self.max_jitter.is_zero() {
            return;
        }
        let secs = rand::rng().random_range(0.0..self.max_jitter.as_secs_f64());
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

#[async_trait]
impl RecordCollector for RemoteCollector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha_remote::profile", skip_all)
    )]
    async fn profile(&self) -> Result<CollectorProfile, GachaError> {
        // A one-draw page is enough to tell whether the authkey is still accepted.
        let probe = PageRequest {
            pool: PoolType::Standard,
            page: 1,
            size: 1,
            end_id: "0".to_string(),
        };
        self.api.gacha_log(&self.query, &probe).await?;

        let pool_names: BTreeMap<PoolType, String> = self
            .api
            .config_list(&self.query)
            .await?
            .into_iter()
            .filter_map(|c| PoolType::from_code(&c.key).map(|p| (p, c.name)))
            .collect();
        Ok(CollectorProfile {
            region: self.query.region(),
            language: self.query.language(),
            pool_names,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha_remote::collect_pool", skip_all, fields(pool = %pool))
    )]
    async fn collect_pool(&self, pool: PoolType) -> Result<Vec<RawDraw>, GachaError> {
        let mut out: Vec<RawDraw> = Vec::new();
        let mut req = PageRequest {
            pool,
            page: 1,
            size: self.page_size,
            end_id: "0".to_string(),
        };
        loop {
            let page = self.api.gacha_log(&self.query, &req).await?;
            let Some(list) = page.list.filter(|l| !l.is_empty()) else {
                break;
            };
            if let Some(last) = list.last() {
                req.end_id = last.id.to_string();
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(page = req.page, draws = list.len(), "history page");
            out.extend(list);
            req.page += 1;
            self.pause().await;
        }
        Ok(out)
    }
}
