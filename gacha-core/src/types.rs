//! Re-export of foundational types from `gacha-types`.
// Consolidated re-exports so downstream crates can depend on `gacha-core` only

pub use gacha_types::{
    DRAW_TIME_FORMAT, DrawTime, ItemType, PoolType, Rank, Record, RecordId, Region,
};
pub use gacha_types::{
    FetchStrategy, GachaConfig, LedgerPolicy, MergeConfig, MergePolicy, Resolution,
};
pub use gacha_types::{GachaError, MergeField};
