//! Gacha record types, the static pool table, merge policies and the shared error type.
#![warn(missing_docs)]

mod config;
mod error;
mod pool;
mod record;
mod region;

pub use config::{FetchStrategy, GachaConfig, LedgerPolicy, MergeConfig, MergePolicy, Resolution};
pub use error::{GachaError, MergeField};
pub use pool::PoolType;
pub use record::{DRAW_TIME_FORMAT, DrawTime, ItemType, Rank, Record, RecordId};
pub use region::Region;
