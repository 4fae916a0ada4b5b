use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DrawTime, GachaError, PoolType, Rank, Record, RecordId, Region};

/// Metadata a collector knows about the account before fetching any pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorProfile {
    /// Game region the history belongs to.
    pub region: Region,
    /// Language the item and pool names are delivered in.
    pub language: String,
    /// Localized pool display names; pools missing here keep their previous name.
    pub pool_names: BTreeMap<PoolType, String>,
}

/// One draw exactly as the remote history API delivers it.
///
/// `uid`, `gacha_type`, `item_id`, `count` and `lang` are dropped when the
/// draw becomes a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDraw {
    /// Account identifier.
    #[serde(default)]
    pub uid: String,
    /// Pool code the draw was made in.
    #[serde(default)]
    pub gacha_type: String,
    /// Internal item id; usually empty.
    #[serde(default)]
    pub item_id: String,
    /// Item count; always `"1"` in practice.
    #[serde(default)]
    pub count: String,
    /// Server wall-clock time.
    pub time: DrawTime,
    /// Localized item name.
    #[serde(default)]
    pub name: String,
    /// Language tag of the names.
    #[serde(default)]
    pub lang: String,
    /// Localized item type label.
    #[serde(default)]
    pub item_type: String,
    /// Star rating.
    pub rank_type: Rank,
    /// Record identifier.
    pub id: RecordId,
}

impl From<RawDraw> for Record {
    fn from(raw: RawDraw) -> Self {
        Self {
            time: raw.time,
            name: raw.name,
            item_type: raw.item_type,
            rank: raw.rank_type,
            id: raw.id,
        }
    }
}

/// Source of draw history for one account.
#[async_trait]
pub trait RecordCollector: Send + Sync {
    /// A stable identifier used in logs and errors (e.g. "gacha-remote").
    fn name(&self) -> &'static str;

    /// Region, language and pool display names of the account.
    async fn profile(&self) -> Result<CollectorProfile, GachaError>;

    /// Every draw of `pool`, newest first, as delivered by the source.
    async fn collect_pool(&self, pool: PoolType) -> Result<Vec<RawDraw>, GachaError>;
}

/// Freshly collected history of one account, ready to be stored in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    /// Account identifier taken from the draws; empty if no draw was found.
    pub subject_id: String,
    /// Collector profile at collection time.
    pub profile: CollectorProfile,
    /// Records per pool, oldest first.
    pub pools: BTreeMap<PoolType, Vec<Record>>,
}

impl Collection {
    /// Build from newest-first raw pages.
    ///
    /// Draws are reversed to oldest first and stripped to [`Record`] fields.
    #[must_use]
    pub fn from_raw(profile: CollectorProfile, raw: BTreeMap<PoolType, Vec<RawDraw>>) -> Self {
        let mut subject_id = String::new();
        let pools = raw
            .into_iter()
            .map(|(pool, draws)| {
                if subject_id.is_empty() {
                    if let Some(d) = draws.iter().find(|d| !d.uid.is_empty()) {
                        subject_id.clone_from(&d.uid);
                    }
                }
                let records: Vec<Record> = draws.into_iter().rev().map(Record::from).collect();
                (pool, records)
            })
            .collect();
        Self {
            subject_id,
            profile,
            pools,
        }
    }

    /// Total number of records across pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    /// True if no pool delivered any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
