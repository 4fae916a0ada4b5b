//! Static reference data: which items were featured ("up") in which pool window.
//!
//! The catalog is built once from two JSON inputs:
//! - histories: `{ "<pool code>": [ { "time": [start, end], "items": { "up": [id, ...] } } ] }`
//! - items: `{ "<item id>": { "<lang>": "<localized name>", ... } }`
//!
//! Item ids are resolved to every localized name at build time, so queries can
//! match a name in any language the item table carries. Entries with missing or
//! malformed fields are skipped while building; lookups against them simply find
//! nothing.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{DrawTime, GachaError, PoolType};

/// One featured window of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Pool the window belongs to.
    pub pool: PoolType,
    /// First second of the window (server time, inclusive).
    pub window_start: DrawTime,
    /// Last second of the window (server time, inclusive).
    pub window_end: DrawTime,
    /// Localized names of the featured items.
    pub featured: BTreeSet<String>,
}

impl CatalogEntry {
    /// True if `moment` falls inside the window (bounds inclusive).
    #[must_use]
    pub fn contains(&self, moment: DrawTime) -> bool {
        self.window_start <= moment && moment <= self.window_end
    }

    /// True if `item_name` is featured in this window.
    #[must_use]
    pub fn features(&self, item_name: &str) -> bool {
        self.featured.contains(item_name)
    }
}

/// Featured-item history for every pool, shared read-only between ledgers.
#[derive(Debug, Clone)]
pub struct HistoryCatalog {
    entries: [Arc<[CatalogEntry]>; PoolType::COUNT],
}

impl Default for HistoryCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl HistoryCatalog {
    /// Catalog without any entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: std::array::from_fn(|_| Arc::from(Vec::new())),
        }
    }

    /// Build from already-resolved entries. Entries are grouped by their pool and
    /// keep their relative order.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut grouped: [Vec<CatalogEntry>; PoolType::COUNT] = std::array::from_fn(|_| vec![]);
        for e in entries {
            grouped[e.pool.index()].push(e);
        }
        Self {
            entries: grouped.map(Arc::from),
        }
    }

    /// Build from parsed history and item tables. Never fails: malformed parts are skipped.
    #[must_use]
    pub fn from_json(histories: &Value, items: &Value) -> Self {
        let empty = Map::new();
        let items = items.as_object().unwrap_or(&empty);
        let Some(histories) = histories.as_object() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("catalog histories are not an object; catalog is empty");
            return Self::empty();
        };

        let mut out: Vec<CatalogEntry> = Vec::new();
        for (code, list) in histories {
            let Some(pool) = PoolType::from_code(code) else {
                continue;
            };
            let Some(list) = list.as_array() else {
                continue;
            };
            for raw in list {
                match parse_entry(pool, raw, items) {
                    Some(entry) => out.push(entry),
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(pool = %pool, entry = %raw, "skipping malformed catalog entry");
                    }
                }
            }
        }
        Self::from_entries(out)
    }

    /// Build from JSON text.
    ///
    /// # Errors
    /// Returns `GachaError::Data` only if either input is not valid JSON;
    /// malformed entries inside valid JSON are skipped.
    pub fn from_json_str(histories: &str, items: &str) -> Result<Self, GachaError> {
        let h: Value = serde_json::from_str(histories)
            .map_err(|e| GachaError::Data(format!("catalog histories: {e}")))?;
        let i: Value = serde_json::from_str(items)
            .map_err(|e| GachaError::Data(format!("catalog items: {e}")))?;
        Ok(Self::from_json(&h, &i))
    }

    /// Entries recorded for `pool`, in source order.
    #[must_use]
    pub fn entries(&self, pool: PoolType) -> &[CatalogEntry] {
        &self.entries[pool.index()]
    }

    pub(crate) fn shared(&self, pool: PoolType) -> Arc<[CatalogEntry]> {
        Arc::clone(&self.entries[pool.index()])
    }

    /// Total number of entries across all pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.len()).sum()
    }

    /// True if no pool has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_entry(pool: PoolType, raw: &Value, items: &Map<String, Value>) -> Option<CatalogEntry> {
    let window = raw.get("time")?.as_array()?;
    let [start, end] = window.as_slice() else {
        return None;
    };
    let window_start = DrawTime::parse(start.as_str()?).ok()?;
    let window_end = DrawTime::parse(end.as_str()?).ok()?;

    let up = raw.get("items")?.get("up")?.as_array()?;
    let featured: BTreeSet<String> = up
        .iter()
        .filter_map(as_text)
        .filter_map(|id| items.get(&id).and_then(Value::as_object))
        .flat_map(|names| names.values().filter_map(Value::as_str).map(str::to_string))
        .collect();

    Some(CatalogEntry {
        pool,
        window_start,
        window_end,
        featured,
    })
}
