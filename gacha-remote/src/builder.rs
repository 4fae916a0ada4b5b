use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gacha_core::GachaError;

use crate::adapter::{DEFAULT_BASE_URL, GachaApi, RealAdapter, default_client};
use crate::logfile::{self, AuthQuery};
use crate::{MAX_PAGE_SIZE, RemoteCollector};

/// Builder for [`RemoteCollector`].
///
/// Credentials are taken, in order of preference, from an explicit query, an
/// explicit history URL, or the game log (explicit path or default locations).
pub struct RemoteCollectorBuilder {
    query: Option<AuthQuery>,
    history_url: Option<String>,
    log_path: Option<PathBuf>,
    base_url: String,
    http: Option<reqwest::Client>,
    adapter: Option<Arc<dyn GachaApi>>,
    page_size: u32,
    max_jitter: Duration,
}

impl Default for RemoteCollectorBuilder {
    fn default() -> Self {
        Self {
            query: None,
            history_url: None,
            log_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: None,
            adapter: None,
            page_size: MAX_PAGE_SIZE,
            max_jitter: Duration::from_secs(2),
        }
    }
}

impl RemoteCollectorBuilder {
    /// Use this query instead of reading the log.
    #[must_use]
    pub fn query(mut self, query: AuthQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Use the query of this history page URL instead of reading the log.
    #[must_use]
    pub fn history_url(mut self, url: impl Into<String>) -> Self {
        self.history_url = Some(url.into());
        self
    }

    /// Read this log file; falls back to the default locations if it does not exist.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// API root (the production endpoint by default).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// HTTP client to send requests with.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Replace the HTTP adapter altogether; `base_url` and `http_client` are ignored.
    #[must_use]
    pub fn adapter(mut self, adapter: Arc<dyn GachaApi>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Draws per page, clamped to `1..=20`.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Upper bound of the random pause between pages; zero disables it.
    #[must_use]
    pub const fn max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    /// Resolve the credentials and build the collector.
    ///
    /// # Errors
    /// - `GachaError::NotFound` if no log or no URL line is found;
    /// - `GachaError::InvalidArg` for a malformed URL or base URL.
    pub async fn build(self) -> Result<RemoteCollector, GachaError> {
        let query = match (self.query, self.history_url) {
            (Some(q), _) => q,
            (None, Some(url)) => AuthQuery::from_url(&url)?,
            (None, None) => {
                let path = logfile::find_log(self.log_path.as_deref()).await?;
                logfile::read_query(&path).await?
            }
        };
        let api: Arc<dyn GachaApi> = match self.adapter {
            Some(a) => a,
            None => {
                let http = match self.http {
                    Some(http) => http,
                    None => default_client()?,
                };
                Arc::new(RealAdapter::new(http, &self.base_url)?)
            }
        };
        let mut collector = RemoteCollector::from_adapter(api, query);
        collector.set_paging(self.page_size, self.max_jitter);
        Ok(collector)
    }
}
