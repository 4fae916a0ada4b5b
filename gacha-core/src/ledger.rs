use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::catalog::CatalogEntry;
use crate::merge::{merge_records, sort_records};
use crate::{
    DrawTime, GachaError, ItemType, LedgerPolicy, MergeField, MergePolicy, PoolType, Rank, Record,
    Region, Resolution,
};

/// Records grouped by `item type → rank → item name`.
pub type Classified<'a> = BTreeMap<ItemType, BTreeMap<Rank, BTreeMap<&'a str, Vec<&'a Record>>>>;

/// Right-hand side of [`PoolLedger::merge`].
#[derive(Debug, Clone)]
pub enum MergeOperand {
    /// A loose batch of records without metadata; merged unconditionally.
    Records(Vec<Record>),
    /// Another ledger; its metadata goes through the ledger policy first.
    Ledger(PoolLedger),
}

impl From<Vec<Record>> for MergeOperand {
    fn from(records: Vec<Record>) -> Self {
        Self::Records(records)
    }
}

impl From<PoolLedger> for MergeOperand {
    fn from(ledger: PoolLedger) -> Self {
        Self::Ledger(ledger)
    }
}

/// Metadata adoptions decided before a ledger merge mutates anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LedgerPlan {
    pub(crate) adopt_region: bool,
    pub(crate) adopt_name: bool,
}

/// Position of one record inside the pity sequence of its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PityStep<'a> {
    /// 1-based position of the record in the ledger.
    pub ordinal: usize,
    /// 1-based draw count since the previous top-rank result.
    pub pity: u32,
    /// The record itself.
    pub record: &'a Record,
}

/// Ordered, deduplicated draw records of one pool for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolLedger {
    pool: PoolType,
    display_name: String,
    region: Region,
    policy: LedgerPolicy,
    records: Vec<Record>,
    catalog: Arc<[CatalogEntry]>,
}

impl PoolLedger {
    /// Empty ledger for `pool` with the default policy and no catalog data.
    #[must_use]
    pub fn new(pool: PoolType) -> Self {
        Self {
            pool,
            display_name: String::new(),
            region: Region::default(),
            policy: LedgerPolicy::default(),
            records: Vec::new(),
            catalog: Arc::from(Vec::new()),
        }
    }

    /// Set the merge policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: LedgerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<Region>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Attach the catalog windows of this pool.
    ///
    /// Entries belonging to another pool are ignored by queries.
    #[must_use]
    pub fn with_catalog(mut self, entries: Arc<[CatalogEntry]>) -> Self {
        self.catalog = entries;
        self
    }

    /// Replace the records. They are kept in the given order.
    #[must_use]
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Pool type of this ledger.
    #[must_use]
    pub const fn pool(&self) -> PoolType {
        self.pool
    }

    /// Pity ceiling of the pool.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.pool.ceiling()
    }

    /// Localized display name, empty if never collected.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Set the display name.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Region the record timestamps belong to.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Set the region.
    pub fn set_region(&mut self, region: impl Into<Region>) {
        self.region = region.into();
    }

    /// Merge policy in effect.
    #[must_use]
    pub const fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Change the merge policy.
    pub fn set_policy(&mut self, policy: LedgerPolicy) {
        self.policy = policy;
    }

    pub(crate) fn set_catalog(&mut self, entries: Arc<[CatalogEntry]>) {
        self.catalog = entries;
    }

    /// Records in their current order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    /// Consume the ledger and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the ledger has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace all records with a freshly collected batch, as is.
    pub fn assign(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Append one record without sorting.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Sort records by `(time, id)`.
    pub fn sort(&mut self) {
        sort_records(&mut self.records);
    }

    /// Decide how the metadata of `other` would be reconciled, without mutating.
    pub(crate) fn plan(&self, other: &Self) -> Result<LedgerPlan, GachaError> {
        if self.pool != other.pool {
            return Err(GachaError::type_mismatch(
                format!("ledger of pool {}", self.pool),
                format!("ledger of pool {}", other.pool),
            ));
        }
        let region = self
            .policy
            .region
            .resolve(MergeField::Region, self.region.as_str(), other.region.as_str())
            .map_err(|e| e.in_pool(self.pool))?;
        let name = resolve_display_name(self.policy.display_name, &self.display_name, &other.display_name)
            .map_err(|e| e.in_pool(self.pool))?;
        Ok(LedgerPlan {
            adopt_region: region == Resolution::Adopt,
            adopt_name: name == Resolution::Adopt,
        })
    }

    /// Check whether merging `other` would succeed, without mutating.
    ///
    /// # Errors
    /// Same conditions as [`PoolLedger::merge`] with a ledger operand.
    pub fn check_merge(&self, other: &Self) -> Result<(), GachaError> {
        self.plan(other).map(|_| ())
    }

    pub(crate) fn apply(&mut self, plan: LedgerPlan, other: Self) {
        if plan.adopt_region {
            self.region = other.region;
        }
        if plan.adopt_name {
            self.display_name = other.display_name;
        }
        self.absorb(other.records);
    }

    pub(crate) fn absorb(&mut self, incoming: Vec<Record>) {
        let current = std::mem::take(&mut self.records);
        self.records = merge_records([current, incoming]);
    }

    /// Merge `other` into this ledger in place.
    ///
    /// A bare record batch is merged unconditionally. A ledger first has its
    /// region and display name reconciled under the ledger policy; on failure
    /// the ledger is left untouched. Records end up sorted and deduplicated.
    ///
    /// # Errors
    /// - `GachaError::TypeMismatch` if `other` is a ledger of another pool.
    /// - `GachaError::MergeConflict` if a `Reject` policy meets differing values.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gacha_core::ledger::merge",
            skip_all,
            fields(pool = %self.pool, before = self.records.len()),
        )
    )]
    pub fn merge(&mut self, other: impl Into<MergeOperand>) -> Result<&mut Self, GachaError> {
        match other.into() {
            MergeOperand::Records(records) => self.absorb(records),
            MergeOperand::Ledger(ledger) => {
                let plan = self.plan(&ledger)?;
                self.apply(plan, ledger);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(after = self.records.len(), "ledger merged");
        Ok(self)
    }

    /// Non-mutating variant of [`PoolLedger::merge`].
    ///
    /// # Errors
    /// Same as [`PoolLedger::merge`].
    pub fn merged(mut self, other: impl Into<MergeOperand>) -> Result<Self, GachaError> {
        self.merge(other)?;
        Ok(self)
    }

    fn group_by<K: Ord>(&self, key: impl Fn(&Record) -> K) -> BTreeMap<K, Vec<&Record>> {
        let mut out: BTreeMap<K, Vec<&Record>> = BTreeMap::new();
        for r in &self.records {
            out.entry(key(r)).or_default().push(r);
        }
        out
    }

    /// Records sharing one draw instant, e.g. the ten results of a multi-draw.
    #[must_use]
    pub fn group_by_exact_timestamp(&self) -> BTreeMap<DrawTime, Vec<&Record>> {
        self.group_by(|r| r.time)
    }

    /// Records by calendar day of their server time.
    #[must_use]
    pub fn group_by_day(&self) -> BTreeMap<NaiveDate, Vec<&Record>> {
        self.group_by(|r| r.time.date())
    }

    /// Records by `item type → rank → item name`.
    ///
    /// Returns an empty mapping if any record has an unrecognised item type or
    /// an empty name.
    #[must_use]
    pub fn group_by_classification(&self) -> Classified<'_> {
        let mut out: Classified<'_> = BTreeMap::new();
        for r in &self.records {
            let Some(class) = r.item_class() else {
                return BTreeMap::new();
            };
            if r.name.is_empty() {
                return BTreeMap::new();
            }
            out.entry(class)
                .or_default()
                .entry(r.rank)
                .or_default()
                .entry(r.name.as_str())
                .or_default()
                .push(r);
        }
        out
    }

    /// Catalog windows of this pool that feature `item_name`, optionally
    /// restricted to windows containing `moment`.
    #[must_use]
    pub fn pity_query(&self, item_name: &str, moment: Option<DrawTime>) -> Vec<&CatalogEntry> {
        self.catalog
            .iter()
            .filter(|e| e.pool == self.pool)
            .filter(|e| moment.is_none_or(|m| e.contains(m)))
            .filter(|e| e.features(item_name))
            .collect()
    }

    /// Pity counter for every record in current order.
    ///
    /// The counter starts at 1 and restarts after each top-rank result.
    #[must_use]
    pub fn pity_progress(&self) -> Vec<PityStep<'_>> {
        let mut pity = 0u32;
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                pity += 1;
                let step = PityStep {
                    ordinal: i + 1,
                    pity,
                    record,
                };
                if record.rank.is_top() {
                    pity = 0;
                }
                step
            })
            .collect()
    }

    /// Draws made since the last top-rank result.
    #[must_use]
    pub fn current_pity(&self) -> u32 {
        let since = self
            .records
            .iter()
            .rev()
            .take_while(|r| !r.rank.is_top())
            .count();
        u32::try_from(since).unwrap_or(u32::MAX)
    }

    /// Draws left until the pity ceiling guarantees a top-rank result.
    #[must_use]
    pub fn remaining_to_ceiling(&self) -> u32 {
        self.ceiling().saturating_sub(self.current_pity())
    }
}

fn resolve_display_name(
    policy: MergePolicy,
    ours: &str,
    theirs: &str,
) -> Result<Resolution, GachaError> {
    if theirs.is_empty() {
        return Ok(Resolution::Unchanged);
    }
    if ours.is_empty() {
        return Ok(Resolution::Adopt);
    }
    policy.resolve(MergeField::DisplayName, ours, theirs)
}
