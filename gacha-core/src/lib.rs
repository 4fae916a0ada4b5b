//! gacha-core
//!
//! Record merge and reconciliation engine for gacha draw histories.
//!
//! - `merge`: sort-then-dedup union of record series.
//! - `ledger`: `PoolLedger`, the per-pool record container with policy-checked merge,
//!   grouping and pity queries.
//! - `session`: `CollectionSession`, one ledger per pool plus account metadata.
//! - `document`: the JSON interchange format sessions are loaded from and dumped to.
//! - `catalog`: featured-item windows used by pity queries.
//! - `collector`: the `RecordCollector` trait implemented by history sources.
//! - `anonymize`: one-way identifier transforms.
//!
//! Everything except `RecordCollector` is synchronous; merges and queries run to
//! completion on in-memory data. Sessions and ledgers are mutated only through
//! `&mut`, so concurrent callers must serialize access themselves.
#![warn(missing_docs)]

/// One-way identifier transforms.
pub mod anonymize;
/// History catalog of featured-item windows.
pub mod catalog;
/// The `RecordCollector` trait and collected-data types.
pub mod collector;
pub mod document;
/// Per-pool record ledgers.
pub mod ledger;
/// Record series merge helpers.
pub mod merge;
/// Collection sessions.
pub mod session;
pub mod types;

pub use anonymize::{IdentifierTransform, Sha256Transform};
pub use catalog::{CatalogEntry, HistoryCatalog};
pub use collector::{Collection, CollectorProfile, RawDraw, RecordCollector};
pub use document::{
    COLLECTOR_TIME_FORMAT, CollectorInfo, DumpOptions, SCHEMA_VERSION, SUPPORTED_VERSIONS,
    SessionDocument, SubjectInfo,
};
pub use ledger::{Classified, MergeOperand, PityStep, PoolLedger};
pub use merge::{is_canonical, merge_records, sort_records};
pub use session::{CollectionSession, HISTORY_WINDOW_DAYS};
pub use types::*;
