use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use gacha_core::{
    Collection, CollectionSession, GachaError, PoolType, RawDraw, RecordCollector,
};

use crate::core::{Gacha, tag_err, with_request_deadline};
use crate::ops::util::collapse_errors;

/// Profile plus every pool, newest-first pages turned into a [`Collection`].
async fn collect_from(c: &dyn RecordCollector) -> Result<Collection, GachaError> {
    let profile = c.profile().await?;
    let mut raw: BTreeMap<PoolType, Vec<RawDraw>> = BTreeMap::new();
    for pool in PoolType::ALL {
        let draws = c.collect_pool(pool).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(collector = c.name(), pool = %pool, draws = draws.len(), "pool collected");
        raw.insert(pool, draws);
    }
    Ok(Collection::from_raw(profile, raw))
}

impl Gacha {
    /// Empty session carrying this orchestrator's merge policies and catalog.
    #[must_use]
    pub fn new_session(&self) -> CollectionSession {
        CollectionSession::new(self.cfg.merge).with_catalog(&self.catalog)
    }

    /// Session built from one collection, stamped at `now`.
    #[must_use]
    pub fn session_from(&self, collection: Collection, now: DateTime<Utc>) -> CollectionSession {
        let mut session = self.new_session();
        session.collect(collection, now);
        session
    }

    /// Earliest draw date the remote history still covers at `now`.
    ///
    /// Older draws survive only in saved exports, so `sync` regularly enough
    /// to keep the master within this window.
    #[must_use]
    pub fn earliest_collectable(now: DateTime<Utc>) -> NaiveDate {
        CollectionSession::earliest_collectable(now)
    }

    /// Collect the full history from the first collector that delivers it.
    ///
    /// Collectors are tried in registration order (only the first one under
    /// `FetchStrategy::FirstOnly`), each bounded by the collector timeout. A
    /// collector that fails on any pool is abandoned as a whole; partial
    /// histories are never returned.
    ///
    /// # Errors
    /// - `GachaError::AllCollectorsFailed` with one entry per attempted collector;
    /// - `GachaError::NotFound` if every collector reported missing data;
    /// - `GachaError::RequestTimeout` if the overall deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gacha::collect",
            skip(self),
            fields(collectors = self.collectors.len()),
        )
    )]
    pub async fn collect(&self) -> Result<CollectionSession, GachaError> {
        with_request_deadline("collect", self.cfg.request_timeout, self.collect_fallback()).await
    }

    async fn collect_fallback(&self) -> Result<CollectionSession, GachaError> {
        let mut attempted_any = false;
        let mut errors: Vec<GachaError> = Vec::new();
        for c in self.ordered() {
            attempted_any = true;
            match Self::collector_call_with_timeout(
                c.name(),
                self.cfg.collector_timeout,
                collect_from(c.as_ref()),
            )
            .await
            {
                Ok(collection) => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(collector = c.name(), records = collection.len(), "history collected");
                    return Ok(self.session_from(collection, Utc::now()));
                }
                Err(e @ (GachaError::CollectorTimeout { .. } | GachaError::NotFound { .. })) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(collector = c.name(), error = %e, "collector gave up");
                    errors.push(e);
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(collector = c.name(), error = %e, "collector failed");
                    errors.push(tag_err(c.name(), e));
                }
            }
        }
        Err(collapse_errors(attempted_any, errors, "wish history"))
    }
}
