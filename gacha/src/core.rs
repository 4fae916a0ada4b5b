use std::sync::Arc;
use std::time::Duration;

use gacha_core::{
    FetchStrategy, GachaConfig, GachaError, HistoryCatalog, MergeConfig, RecordCollector,
};

/// Orchestrator that collects from registered collectors and reconciles the
/// result with saved exports.
pub struct Gacha {
    pub(crate) collectors: Vec<Arc<dyn RecordCollector>>,
    pub(crate) cfg: GachaConfig,
    pub(crate) catalog: HistoryCatalog,
}

/// Builder for constructing a `Gacha` orchestrator with custom configuration.
pub struct GachaBuilder {
    collectors: Vec<Arc<dyn RecordCollector>>,
    cfg: GachaConfig,
    catalog: HistoryCatalog,
}

impl Default for GachaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GachaBuilder {
    /// Create a new builder with defaults.
    ///
    /// - Starts with no collectors; register at least one via [`with_collector`](Self::with_collector).
    /// - Every merge policy is `Reject`, fetches fall back in registration order,
    ///   each collector gets five minutes, and there is no overall deadline.
    /// - The catalog is empty, so pity queries see no featured windows until one is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collectors: vec![],
            cfg: GachaConfig::default(),
            catalog: HistoryCatalog::empty(),
        }
    }

    /// Register a collector. Registration order is the fallback order.
    #[must_use]
    pub fn with_collector(mut self, c: Arc<dyn RecordCollector>) -> Self {
        self.collectors.push(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, cfg: GachaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Per-field policies applied when sessions are merged.
    #[must_use]
    pub const fn merge_config(mut self, merge: MergeConfig) -> Self {
        self.cfg.merge = merge;
        self
    }

    /// How collectors are tried during `collect`.
    #[must_use]
    pub const fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.cfg.fetch_strategy = strategy;
        self
    }

    /// Upper bound for one collector to deliver its whole history.
    #[must_use]
    pub const fn collector_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.collector_timeout = timeout;
        self
    }

    /// Deadline for a whole `collect` call, across fallbacks.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Featured-item windows attached to every session this orchestrator produces.
    #[must_use]
    pub fn catalog(mut self, catalog: HistoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `GachaError::InvalidArg` if no collector is registered or a
    /// timeout is zero.
    pub fn build(self) -> Result<Gacha, GachaError> {
        if self.collectors.is_empty() {
            return Err(GachaError::InvalidArg(
                "no collectors registered; add at least one via with_collector(...)".to_string(),
            ));
        }
        if self.cfg.collector_timeout.is_zero()
            || self.cfg.request_timeout.is_some_and(|d| d.is_zero())
        {
            return Err(GachaError::InvalidArg("timeouts must be non-zero".to_string()));
        }
        Ok(Gacha {
            collectors: self.collectors,
            cfg: self.cfg,
            catalog: self.catalog,
        })
    }
}

/// Wrap a collector error so the aggregate names its source.
pub fn tag_err(collector: &str, e: GachaError) -> GachaError {
    match e {
        e @ (GachaError::NotFound { .. }
        | GachaError::CollectorTimeout { .. }
        | GachaError::Collector { .. }
        | GachaError::RequestTimeout { .. }
        | GachaError::AllCollectorsFailed(_)) => e,
        other => GachaError::Collector {
            collector: collector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Apply an optional deadline to `fut`.
pub(crate) async fn with_request_deadline<T, Fut>(
    operation: &'static str,
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, GachaError>
where
    Fut: core::future::Future<Output = Result<T, GachaError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or_else(|_| Err(GachaError::request_timeout(operation))),
        None => fut.await,
    }
}

impl Gacha {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gacha::core::collector_call_with_timeout",
            skip(fut),
            fields(
                collector = collector_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn collector_call_with_timeout<T, Fut>(
        collector_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, GachaError>
    where
        Fut: core::future::Future<Output = Result<T, GachaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(GachaError::collector_timeout(collector_name)))
    }

    /// Start building an orchestrator.
    #[must_use]
    pub fn builder() -> GachaBuilder {
        GachaBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GachaConfig {
        &self.cfg
    }

    /// Catalog attached to produced sessions.
    #[must_use]
    pub const fn catalog(&self) -> &HistoryCatalog {
        &self.catalog
    }

    /// Collectors to try, in order, under the configured fetch strategy.
    pub(crate) fn ordered(&self) -> &[Arc<dyn RecordCollector>] {
        match self.cfg.fetch_strategy {
            FetchStrategy::FirstOnly => &self.collectors[..1.min(self.collectors.len())],
            _ => &self.collectors,
        }
    }
}
