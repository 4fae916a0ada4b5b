//! Gacha collects wish histories from pluggable collectors and reconciles them
//! with saved exports.
//!
//! Overview
//! - Collects through collectors that implement the `gacha_core::RecordCollector` contract.
//! - Falls back across collectors in registration order, each under a timeout.
//! - Loads and saves the JSON export format and merges exports under per-field policies.
//! - Normalizes error handling and exposes uniform domain types from `gacha_core`.
//!
//! Key behaviors and trade-offs
//! - Fetch strategy:
//!   - `PriorityWithFallback`: tries collectors in order until one delivers the whole
//!     history; a collector failing on any pool is abandoned, never half-used.
//!   - `FirstOnly`: a single attempt; failures surface immediately.
//! - Merge policies: `Reject` (the default) refuses to merge exports of different
//!   accounts, regions or languages; `Overwrite` lets the incoming export win and
//!   `Keep` keeps the existing value. Records are always unioned and deduplicated.
//! - History window: the remote API only serves about six months, so `sync` into a
//!   master export is what preserves older draws.
//!
//! Examples
//! Building an orchestrator and syncing a master export:
//! ```rust,ignore
//! use std::sync::Arc;
//! use gacha::{DumpOptions, Gacha, MergeConfig, MergePolicy};
//! use gacha_remote::RemoteCollector;
//!
//! let remote = Arc::new(RemoteCollector::builder().build().await?);
//! let gacha = Gacha::builder()
//!     .with_collector(remote)
//!     .merge_config(MergeConfig { language: MergePolicy::Overwrite, ..Default::default() })
//!     .build()?;
//! let master = gacha.sync("wishes.json", DumpOptions::default()).await?;
//! println!("{} records", master.len());
//! ```
//!
//! Merging exports from two machines:
//! ```rust,ignore
//! let merged = gacha.load_all(&["desktop.json", "laptop.json"]).await?;
//! gacha.save(&merged, "merged.json", DumpOptions::default()).await?;
//! ```
//!
//! See `gacha/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod ops;

pub use core::{Gacha, GachaBuilder};
pub use ops::util::collapse_errors;

// Re-export core types for convenience
pub use gacha_core::{
    // Engine
    CatalogEntry,
    Classified,
    Collection,
    CollectionSession,
    CollectorProfile,
    DumpOptions,
    // Foundational types
    DrawTime,
    FetchStrategy,
    GachaConfig,
    GachaError,
    HistoryCatalog,
    IdentifierTransform,
    ItemType,
    LedgerPolicy,
    MergeConfig,
    MergeField,
    MergeOperand,
    MergePolicy,
    PityStep,
    PoolLedger,
    PoolType,
    Rank,
    RawDraw,
    Record,
    RecordCollector,
    RecordId,
    Region,
    SessionDocument,
    Sha256Transform,
    is_canonical,
    merge_records,
    sort_records,
};
