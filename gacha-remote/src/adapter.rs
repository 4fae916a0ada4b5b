#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gacha_core::{GachaError, PoolType, RawDraw};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::logfile::AuthQuery;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://hk4e-api.mihoyo.com/event/gacha_info/api/";

const CONNECTOR: &str = "gacha-remote";

/// Envelope of every API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Zero on success.
    pub retcode: i64,
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// Payload; `null` on failure.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful response.
    ///
    /// # Errors
    /// `GachaError::Collector` for a non-zero `retcode` or a missing payload.
    pub fn into_data(self, what: &str) -> Result<T, GachaError> {
        if self.retcode != 0 {
            return Err(GachaError::collector(
                CONNECTOR,
                format!("{what}: ({}) {}", self.retcode, self.message),
            ));
        }
        self.data.ok_or_else(|| {
            GachaError::collector(CONNECTOR, format!("{what}: response carries no data"))
        })
    }
}

/// One page of `getGachaLog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogPage {
    /// Draws on this page, newest first; `null` past the end.
    #[serde(default)]
    pub list: Option<Vec<RawDraw>>,
    /// Region the server answered for.
    #[serde(default)]
    pub region: Option<String>,
}

/// One entry of `getConfigList`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Server-side id of the pool entry.
    #[serde(default)]
    pub id: String,
    /// Pool code.
    pub key: String,
    /// Localized display name.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ConfigList {
    #[serde(default)]
    gacha_type_list: Vec<PoolConfig>,
}

/// Page request parameters for `getGachaLog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Pool to list.
    pub pool: PoolType,
    /// 1-based page number.
    pub page: u32,
    /// Page size, at most 20.
    pub size: u32,
    /// Id of the last draw of the previous page, `"0"` for the first page.
    pub end_id: String,
}

/// History API abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait GachaApi: Send + Sync {
    /// Fetch one page of draws.
    async fn gacha_log(&self, query: &AuthQuery, req: &PageRequest) -> Result<LogPage, GachaError>;

    /// Fetch the pool list with localized display names.
    async fn config_list(&self, query: &AuthQuery) -> Result<Vec<PoolConfig>, GachaError>;
}

/// Production adapter backed by `reqwest`.
pub struct RealAdapter {
    http: reqwest::Client,
    base: Url,
}

fn map_http_err(e: &reqwest::Error, what: &str) -> GachaError {
    if e.is_timeout() {
        GachaError::collector_timeout(CONNECTOR)
    } else {
        GachaError::collector(CONNECTOR, format!("{what}: {e}"))
    }
}

/// HTTP client with a per-request timeout.
///
/// # Errors
/// Fails if the TLS backend cannot be initialised.
pub fn default_client() -> Result<reqwest::Client, GachaError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| map_http_err(&e, "build http client"))
}

impl RealAdapter {
    /// Adapter against `base` using `http`.
    ///
    /// # Errors
    /// `GachaError::InvalidArg` if `base` is not a URL.
    pub fn new(http: reqwest::Client, base: &str) -> Result<Self, GachaError> {
        // `Url::join` drops the last segment unless the base ends with a slash.
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&base)
            .map_err(|e| GachaError::InvalidArg(format!("bad api base url: {e}")))?;
        Ok(Self { http, base })
    }

    /// Adapter against the production API with a default client.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn new_default() -> Result<Self, GachaError> {
        Self::new(default_client()?, DEFAULT_BASE_URL)
    }

    async fn get<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        pairs: Vec<(String, String)>,
    ) -> Result<T, GachaError> {
        let mut url = self
            .base
            .join(endpoint)
            .map_err(|e| GachaError::InvalidArg(format!("bad endpoint {endpoint}: {e}")))?;
        url.query_pairs_mut().extend_pairs(pairs);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_http_err(&e, endpoint))?
            .error_for_status()
            .map_err(|e| map_http_err(&e, endpoint))?;
        let envelope: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| map_http_err(&e, endpoint))?;
        envelope.into_data(endpoint)
    }
}

#[async_trait]
impl GachaApi for RealAdapter {
    async fn gacha_log(&self, query: &AuthQuery, req: &PageRequest) -> Result<LogPage, GachaError> {
        let pairs = query.with_overrides(&[
            ("size", req.size.to_string()),
            ("gacha_type", req.pool.code().to_string()),
            ("page", req.page.to_string()),
            ("end_id", req.end_id.clone()),
        ]);
        self.get("getGachaLog", pairs).await
    }

    async fn config_list(&self, query: &AuthQuery) -> Result<Vec<PoolConfig>, GachaError> {
        let list: ConfigList = self
            .get("getConfigList", query.with_overrides(&[]))
            .await?;
        Ok(list.gacha_type_list)
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn GachaApi {
    /// Build a `GachaApi` from two closures (tests only).
    pub fn from_fns<FLog, FConf>(flog: FLog, fconf: FConf) -> Arc<dyn GachaApi>
    where
        FLog: Send + Sync + 'static + Fn(PageRequest) -> Result<LogPage, GachaError>,
        FConf: Send + Sync + 'static + Fn() -> Result<Vec<PoolConfig>, GachaError>,
    {
        struct FnApi<FLog, FConf>(FLog, FConf);
        #[async_trait]
        impl<FLog, FConf> GachaApi for FnApi<FLog, FConf>
        where
            FLog: Send + Sync + 'static + Fn(PageRequest) -> Result<LogPage, GachaError>,
            FConf: Send + Sync + 'static + Fn() -> Result<Vec<PoolConfig>, GachaError>,
        {
            async fn gacha_log(
                &self,
                _query: &AuthQuery,
                req: &PageRequest,
            ) -> Result<LogPage, GachaError> {
                (self.0)(req.clone())
            }

            async fn config_list(&self, _query: &AuthQuery) -> Result<Vec<PoolConfig>, GachaError> {
                (self.1)()
            }
        }
        Arc::new(FnApi(flog, fconf))
    }
}
