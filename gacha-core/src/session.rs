use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::anonymize::IdentifierTransform;
use crate::catalog::HistoryCatalog;
use crate::collector::Collection;
use crate::document::SCHEMA_VERSION;
use crate::ledger::{LedgerPlan, PoolLedger};
use crate::{GachaError, MergeConfig, MergeField, PoolType, Record, RecordId, Region, Resolution};

/// How far back the remote history reaches.
pub const HISTORY_WINDOW_DAYS: i64 = 179;

/// All pool ledgers of one account plus session metadata.
///
/// There is always exactly one ledger per [`PoolType`], in [`PoolType::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSession {
    subject_id: String,
    language: String,
    region: Region,
    created_at: Option<DateTime<Utc>>,
    modified_at: Option<DateTime<Utc>>,
    version: String,
    config: MergeConfig,
    ledgers: [PoolLedger; PoolType::COUNT],
}

impl Default for CollectionSession {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

impl CollectionSession {
    /// Empty session using `config` for every merge.
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        let policy = config.ledger_policy();
        Self {
            subject_id: String::new(),
            language: String::new(),
            region: Region::default(),
            created_at: None,
            modified_at: None,
            version: SCHEMA_VERSION.to_string(),
            config,
            ledgers: PoolType::ALL.map(|p| PoolLedger::new(p).with_policy(policy)),
        }
    }

    /// Attach catalog data to every ledger.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &HistoryCatalog) -> Self {
        self.set_catalog(catalog);
        self
    }

    /// Attach catalog data to every ledger.
    pub fn set_catalog(&mut self, catalog: &HistoryCatalog) {
        for ledger in &mut self.ledgers {
            ledger.set_catalog(catalog.shared(ledger.pool()));
        }
    }

    /// Account identifier (possibly anonymised).
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Set the account identifier.
    pub fn set_subject_id(&mut self, subject_id: impl Into<String>) {
        self.subject_id = subject_id.into();
    }

    /// Language tag of the collected names.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Set the language tag.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Game region.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Set the region of the session and of every ledger.
    pub fn set_region(&mut self, region: impl Into<Region>) {
        self.region = region.into();
        for ledger in &mut self.ledgers {
            ledger.set_region(self.region.clone());
        }
    }

    /// When the first collection of this history started.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Latest collection or merge time.
    #[must_use]
    pub const fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Set both timestamps.
    pub fn set_timestamps(
        &mut self,
        created_at: Option<DateTime<Utc>>,
        modified_at: Option<DateTime<Utc>>,
    ) {
        self.created_at = created_at;
        self.modified_at = modified_at;
    }

    /// Document schema version this session was loaded from.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Merge policies in effect.
    #[must_use]
    pub const fn config(&self) -> MergeConfig {
        self.config
    }

    /// Change the merge policies of the session and its ledgers.
    pub fn set_config(&mut self, config: MergeConfig) {
        self.config = config;
        for ledger in &mut self.ledgers {
            ledger.set_policy(config.ledger_policy());
        }
    }

    /// Ledger of `pool`.
    #[must_use]
    pub fn ledger(&self, pool: PoolType) -> &PoolLedger {
        &self.ledgers[pool.index()]
    }

    /// Mutable ledger of `pool`.
    pub fn ledger_mut(&mut self, pool: PoolType) -> &mut PoolLedger {
        &mut self.ledgers[pool.index()]
    }

    /// All ledgers in canonical pool order.
    #[must_use]
    pub fn ledgers(&self) -> &[PoolLedger] {
        &self.ledgers
    }

    /// Total number of records across all pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ledgers.iter().map(PoolLedger::len).sum()
    }

    /// True if no pool holds a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort every ledger by `(time, id)`.
    pub fn sort(&mut self) {
        self.ledgers.iter_mut().for_each(PoolLedger::sort);
    }

    /// Pool code to display name.
    #[must_use]
    pub fn pool_names(&self) -> BTreeMap<PoolType, &str> {
        self.ledgers
            .iter()
            .map(|l| (l.pool(), l.display_name()))
            .collect()
    }

    /// Store a fresh collection, replacing the records of every collected pool.
    ///
    /// `modified_at` becomes `now`; `created_at` is set to `now` only if unset.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gacha_core::session::collect",
            skip_all,
            fields(records = collection.len()),
        )
    )]
    pub fn collect(&mut self, collection: Collection, now: DateTime<Utc>) {
        let now = now.with_nanosecond(0).unwrap_or(now);
        self.modified_at = Some(now);
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        if !collection.subject_id.is_empty() {
            self.subject_id = collection.subject_id;
        }
        self.language = collection.profile.language;
        self.set_region(collection.profile.region);
        for (pool, name) in collection.profile.pool_names {
            self.ledger_mut(pool).set_display_name(name);
        }
        for (pool, records) in collection.pools {
            self.ledger_mut(pool).assign(records);
        }
    }

    /// Merge a loose batch of records into one pool.
    pub fn merge_records(&mut self, pool: PoolType, records: Vec<Record>) -> &mut Self {
        self.ledger_mut(pool).absorb(records);
        self
    }

    /// Merge `other` into this session in place.
    ///
    /// Region, language and subject id are reconciled under the session
    /// policies, and every ledger's region and display name under the ledger
    /// policies. All checks run before anything is mutated, so a failed merge
    /// leaves the session unchanged. On success each ledger holds the sorted,
    /// deduplicated union and `modified_at` is the latest of the four timestamps.
    ///
    /// # Errors
    /// Returns `GachaError::MergeConflict` naming the field (and the pool for
    /// ledger-level fields) when a `Reject` policy meets differing values.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gacha_core::session::merge",
            skip_all,
            fields(before = self.len(), incoming = other.len()),
        )
    )]
    pub fn merge(&mut self, other: Self) -> Result<&mut Self, GachaError> {
        let region = self.config.region.resolve(
            MergeField::Region,
            self.region.as_str(),
            other.region.as_str(),
        )?;
        let language =
            self.config
                .language
                .resolve(MergeField::Language, &self.language, &other.language)?;
        let subject =
            self.config
                .subject
                .resolve(MergeField::Subject, &self.subject_id, &other.subject_id)?;
        let plans = self
            .ledgers
            .iter()
            .zip(other.ledgers.iter())
            .map(|(ours, theirs)| ours.plan(theirs))
            .collect::<Result<Vec<LedgerPlan>, GachaError>>()?;

        let modified = [
            self.created_at,
            self.modified_at,
            other.created_at,
            other.modified_at,
        ]
        .into_iter()
        .max()
        .flatten();
        let created = match (self.created_at, other.created_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        if region == Resolution::Adopt {
            self.region = other.region;
        }
        if language == Resolution::Adopt {
            self.language = other.language;
        }
        if subject == Resolution::Adopt {
            self.subject_id = other.subject_id;
        }
        for ((ledger, plan), theirs) in self.ledgers.iter_mut().zip(plans).zip(other.ledgers) {
            ledger.apply(plan, theirs);
            ledger.set_region(self.region.clone());
        }
        self.created_at = created;
        self.modified_at = modified;

        #[cfg(feature = "tracing")]
        tracing::debug!(after = self.len(), "session merged");
        Ok(self)
    }

    /// Non-mutating variant of [`CollectionSession::merge`].
    ///
    /// # Errors
    /// Same as [`CollectionSession::merge`].
    pub fn merged(mut self, other: Self) -> Result<Self, GachaError> {
        self.merge(other)?;
        Ok(self)
    }

    /// Replace the subject id and every record id with their transformed values.
    ///
    /// Ledgers are re-sorted since record ids take part in the order.
    pub fn anonymize(&mut self, transform: &dyn IdentifierTransform) {
        if !self.subject_id.is_empty() {
            self.subject_id = transform.subject(&self.subject_id);
        }
        for ledger in &mut self.ledgers {
            let records = ledger
                .take_records()
                .into_iter()
                .map(|mut r| {
                    r.id = RecordId::new(transform.record(r.id.as_str()));
                    r
                })
                .collect();
            ledger.assign(records);
            ledger.sort();
        }
    }

    /// Earliest date the remote history can still deliver at `now`.
    #[must_use]
    pub fn earliest_collectable(now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(HISTORY_WINDOW_DAYS)).date_naive()
    }
}
