//! Discovery of the game log and extraction of the authenticated history URL.

use std::path::{Path, PathBuf};

use gacha_core::{GachaError, Region};
use url::Url;

/// Prefix of the log line that carries the history page URL.
pub const LOG_PREFIX: &str = "OnGetWebViewPageFinish:";

/// Log locations relative to the user profile directory (CN client, global client).
pub const LOG_LOCATIONS: [&str; 2] = [
    r"AppData\LocalLow\miHoYo\原神\output_log.txt",
    r"AppData\LocalLow\miHoYo\Genshin Impact\output_log.txt",
];

/// Query parameters of the history page URL, in their original order.
///
/// They carry the credentials (`authkey`) plus `lang` and `region`, and are
/// replayed on every API request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthQuery {
    params: Vec<(String, String)>,
}

impl AuthQuery {
    /// Build from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse the query of a history page URL.
    ///
    /// # Errors
    /// `GachaError::InvalidArg` if `url` is not a URL or has no `authkey`.
    pub fn from_url(url: &str) -> Result<Self, GachaError> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| GachaError::InvalidArg(format!("bad history url: {e}")))?;
        let q = Self::from_pairs(parsed.query_pairs().into_owned());
        if q.get("authkey").is_none() {
            return Err(GachaError::InvalidArg(
                "history url carries no authkey".into(),
            ));
        }
        Ok(q)
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Game region named by the URL, empty if absent.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::from(self.get("region").unwrap_or_default())
    }

    /// Language tag named by the URL, empty if absent.
    #[must_use]
    pub fn language(&self) -> String {
        self.get("lang").unwrap_or_default().to_string()
    }

    /// All pairs with `overrides` replacing (or appending) their keys.
    #[must_use]
    pub fn with_overrides(&self, overrides: &[(&str, String)]) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| !overrides.iter().any(|(o, _)| o == k))
            .cloned()
            .collect();
        out.extend(overrides.iter().map(|(k, v)| ((*k).to_string(), v.clone())));
        out
    }
}

/// Candidate log paths under `profile_dir`, CN client first.
#[must_use]
pub fn default_log_paths(profile_dir: &Path) -> Vec<PathBuf> {
    LOG_LOCATIONS
        .iter()
        .map(|rel| rel.split('\\').fold(profile_dir.to_path_buf(), |p, c| p.join(c)))
        .collect()
}

/// Pick the log file: `explicit` if it exists, else the first existing default
/// location under `USERPROFILE`.
///
/// # Errors
/// `GachaError::NotFound` if no candidate exists.
pub async fn find_log(explicit: Option<&Path>) -> Result<PathBuf, GachaError> {
    if let Some(p) = explicit
        && tokio::fs::try_exists(p).await.unwrap_or(false)
    {
        return Ok(p.to_path_buf());
    }
    let profile = std::env::var_os("USERPROFILE")
        .ok_or_else(|| GachaError::not_found("USERPROFILE environment variable"))?;
    for candidate in default_log_paths(Path::new(&profile)) {
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Ok(candidate);
        }
    }
    Err(GachaError::not_found(
        "game log output_log.txt; open the wish history in game first",
    ))
}

/// Extract the most recent history URL query from log text.
///
/// # Errors
/// `GachaError::NotFound` if no line carries the URL, or the error of
/// [`AuthQuery::from_url`] if the line is malformed.
pub fn extract_query(log_text: &str) -> Result<AuthQuery, GachaError> {
    let line = log_text
        .lines()
        .rev()
        .find_map(|l| l.strip_prefix(LOG_PREFIX))
        .ok_or_else(|| {
            GachaError::not_found("history url in game log; open the wish history in game first")
        })?;
    AuthQuery::from_url(line)
}

/// Read `path` and extract the history URL query from it.
///
/// # Errors
/// I/O failures, or the errors of [`extract_query`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "gacha_remote::read_query", skip_all, fields(path = %path.display()))
)]
pub async fn read_query(path: &Path) -> Result<AuthQuery, GachaError> {
    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    extract_query(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://webstatic.mihoyo.com/hk4e/event/e20190909gacha/index.html?authkey_ver=1&sign_type=2&auth_appid=webview_gacha&init_type=301&lang=zh-cn&region=cn_gf01&authkey=abc%2Bdef&game_biz=hk4e_cn#/log";

    #[test]
    fn extracts_last_matching_line() {
        let log = format!(
            "noise\n{LOG_PREFIX}https://example.com/?authkey=old&lang=en-us&region=os_usa\nmore\n{LOG_PREFIX}{URL}\ntrailing"
        );
        let q = extract_query(&log).unwrap();
        assert_eq!(q.get("authkey"), Some("abc+def"));
        assert_eq!(q.language(), "zh-cn");
        assert_eq!(q.region().as_str(), "cn_gf01");
    }

    #[test]
    fn missing_line_is_not_found() {
        assert!(matches!(
            extract_query("nothing here"),
            Err(GachaError::NotFound { .. })
        ));
    }

    #[test]
    fn url_without_authkey_is_rejected() {
        assert!(matches!(
            AuthQuery::from_url("https://example.com/?lang=en"),
            Err(GachaError::InvalidArg(_))
        ));
    }

    #[test]
    fn overrides_replace_and_append() {
        let q = AuthQuery::from_pairs([("authkey", "k"), ("size", "6")]);
        let pairs = q.with_overrides(&[("size", "20".to_string()), ("page", "1".to_string())]);
        assert_eq!(
            pairs,
            vec![
                ("authkey".to_string(), "k".to_string()),
                ("size".to_string(), "20".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn default_paths_cover_both_clients() {
        let paths = default_log_paths(Path::new("/home/u"));
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("output_log.txt"));
        assert!(paths[1].to_string_lossy().contains("Genshin Impact"));
    }
}
