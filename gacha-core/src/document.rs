//! JSON interchange document for persisted sessions.
//!
//! Layout:
//! ```json
//! {
//!   "collector": {"version": "2.0", "create": "...", "modify": "..."},
//!   "infos": {"uid": "...", "lang": "...", "region": "..."},
//!   "wishes": {"100": "<display name>", ...},
//!   "records": {"100": [{"time": "...", "name": "...", "item_type": "...", "rank_type": "5", "id": "..."}], ...}
//! }
//! ```
//! `infos` is left out of redacted dumps. Missing sections load as defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::CollectionSession;
use crate::{GachaError, MergeConfig, PoolType, Record};

/// Schema version written by this crate.
pub const SCHEMA_VERSION: &str = "2.0";
/// Schema versions that can be loaded.
pub const SUPPORTED_VERSIONS: [&str; 4] = ["1.4", "1.5", "1.6", "2.0"];
/// Format of the `create`/`modify` timestamps (always UTC).
pub const COLLECTOR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC+0";

/// `collector` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorInfo {
    /// Schema version.
    #[serde(default)]
    pub version: String,
    /// Creation time, [`COLLECTOR_TIME_FORMAT`], empty if unknown.
    #[serde(default)]
    pub create: String,
    /// Modification time, [`COLLECTOR_TIME_FORMAT`], empty if unknown.
    #[serde(default)]
    pub modify: String,
}

/// `infos` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInfo {
    /// Account identifier.
    #[serde(default)]
    pub uid: String,
    /// Language tag.
    #[serde(default)]
    pub lang: String,
    /// Region code.
    #[serde(default)]
    pub region: String,
}

/// Whole document. Pool-keyed maps use the pool code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Schema version and timestamps.
    #[serde(default)]
    pub collector: CollectorInfo,
    /// Account metadata; `None` in redacted dumps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infos: Option<SubjectInfo>,
    /// Pool display names.
    #[serde(default)]
    pub wishes: BTreeMap<String, String>,
    /// Records per pool.
    #[serde(default)]
    pub records: BTreeMap<String, Vec<Record>>,
}

/// Options for [`CollectionSession::to_document`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Leave out the `infos` section (account id, language, region).
    pub redact: bool,
}

impl DumpOptions {
    /// Options for a redacted dump.
    #[must_use]
    pub const fn redacted() -> Self {
        Self { redact: true }
    }
}

fn parse_stamp(s: &str) -> Result<Option<DateTime<Utc>>, GachaError> {
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(s, COLLECTOR_TIME_FORMAT)
        .map(|n| Some(n.and_utc()))
        .map_err(|e| GachaError::Data(format!("bad collector timestamp {s:?}: {e}")))
}

fn format_stamp(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format(COLLECTOR_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

impl CollectionSession {
    /// Build a session from a parsed document.
    ///
    /// Records are kept in document order. Pool keys that are not known pool
    /// codes are ignored.
    ///
    /// # Errors
    /// `GachaError::Data` for an unsupported schema version or a malformed timestamp.
    pub fn from_document(doc: SessionDocument, config: MergeConfig) -> Result<Self, GachaError> {
        let version = if doc.collector.version.is_empty() {
            SCHEMA_VERSION.to_string()
        } else if SUPPORTED_VERSIONS.contains(&doc.collector.version.as_str()) {
            doc.collector.version
        } else {
            return Err(GachaError::Data(format!(
                "unsupported document version {:?}",
                doc.collector.version
            )));
        };

        let mut session = Self::new(config);
        session.set_version(version);
        session.set_timestamps(
            parse_stamp(&doc.collector.create)?,
            parse_stamp(&doc.collector.modify)?,
        );
        if let Some(infos) = doc.infos {
            session.set_subject_id(infos.uid);
            session.set_language(infos.lang);
            session.set_region(infos.region);
        }
        for (code, name) in doc.wishes {
            match PoolType::from_code(&code) {
                Some(pool) => session.ledger_mut(pool).set_display_name(name),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code = %code, "ignoring pool name for unknown pool");
                }
            }
        }
        for (code, records) in doc.records {
            match PoolType::from_code(&code) {
                Some(pool) => session.ledger_mut(pool).assign(records),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code = %code, "ignoring records of unknown pool");
                }
            }
        }
        Ok(session)
    }

    /// Document for this session. Every pool is written, empty ones included.
    ///
    /// Records are always written in the current shape, so the document
    /// carries [`SCHEMA_VERSION`] whatever version the session was loaded from.
    #[must_use]
    pub fn to_document(&self, opts: DumpOptions) -> SessionDocument {
        let infos = (!opts.redact).then(|| SubjectInfo {
            uid: self.subject_id().to_string(),
            lang: self.language().to_string(),
            region: self.region().to_string(),
        });
        SessionDocument {
            collector: CollectorInfo {
                version: SCHEMA_VERSION.to_string(),
                create: format_stamp(self.created_at()),
                modify: format_stamp(self.modified_at()),
            },
            infos,
            wishes: self
                .ledgers()
                .iter()
                .map(|l| (l.pool().code().to_string(), l.display_name().to_string()))
                .collect(),
            records: self
                .ledgers()
                .iter()
                .map(|l| (l.pool().code().to_string(), l.records().to_vec()))
                .collect(),
        }
    }

    /// Parse a session from JSON text.
    ///
    /// # Errors
    /// `GachaError::Data` if the text is not a valid document.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha_core::document::load", skip_all, fields(bytes = text.len()))
    )]
    pub fn load_str(text: &str, config: MergeConfig) -> Result<Self, GachaError> {
        let doc: SessionDocument = serde_json::from_str(text)
            .map_err(|e| GachaError::Data(format!("invalid session document: {e}")))?;
        Self::from_document(doc, config)
    }

    /// Render the session as pretty-printed JSON.
    ///
    /// # Errors
    /// `GachaError::Data` if serialization fails.
    pub fn dump_string(&self, opts: DumpOptions) -> Result<String, GachaError> {
        serde_json::to_string_pretty(&self.to_document(opts))
            .map_err(|e| GachaError::Data(format!("cannot serialize session: {e}")))
    }
}
