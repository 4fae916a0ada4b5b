//! Configuration types shared by the engine, collectors and the orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GachaError, MergeField};

/// Tri-state rule for reconciling a metadata field that differs between the
/// merge destination and the incoming operand.
///
/// Equal values never trigger the policy. The empty string is a value like any
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MergePolicy {
    /// Adopt the incoming value.
    Overwrite,
    /// Fail the merge with `GachaError::MergeConflict`.
    #[default]
    Reject,
    /// Keep the destination value and ignore the mismatch.
    Keep,
}

/// Outcome of applying a [`MergePolicy`] to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The destination value stays.
    Unchanged,
    /// The destination takes the incoming value.
    Adopt,
}

impl MergePolicy {
    /// Decide what to do with a field whose values are `ours` and `theirs`.
    ///
    /// # Errors
    /// Returns `GachaError::MergeConflict` when the values differ and the policy is `Reject`.
    pub fn resolve(
        self,
        field: MergeField,
        ours: &str,
        theirs: &str,
    ) -> Result<Resolution, GachaError> {
        if ours == theirs {
            return Ok(Resolution::Unchanged);
        }
        match self {
            Self::Overwrite => Ok(Resolution::Adopt),
            Self::Keep => Ok(Resolution::Unchanged),
            Self::Reject => Err(GachaError::merge_conflict(field, ours, theirs)),
        }
    }
}

/// Merge policies for the session-level metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Policy for the game region.
    pub region: MergePolicy,
    /// Policy for the collection language.
    pub language: MergePolicy,
    /// Policy for the player (subject) identifier.
    pub subject: MergePolicy,
}

impl MergeConfig {
    /// Same policy for every field.
    #[must_use]
    pub const fn uniform(policy: MergePolicy) -> Self {
        Self {
            region: policy,
            language: policy,
            subject: policy,
        }
    }

    /// Policies applied by each pool ledger of a session using this config.
    ///
    /// Pool display names are localized, so they follow the language policy.
    #[must_use]
    pub const fn ledger_policy(&self) -> LedgerPolicy {
        LedgerPolicy {
            region: self.region,
            display_name: self.language,
        }
    }
}

/// Merge policies for the metadata carried by a single pool ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    /// Policy for the ledger region.
    pub region: MergePolicy,
    /// Policy for two differing non-empty display names.
    pub display_name: MergePolicy,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            region: MergePolicy::Reject,
            display_name: MergePolicy::Overwrite,
        }
    }
}

/// Strategy for selecting among registered collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FetchStrategy {
    /// Use registration order and fall back to the next collector on failure.
    #[default]
    PriorityWithFallback,
    /// Only ever ask the first registered collector.
    FirstOnly,
}

/// Global configuration for the `Gacha` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GachaConfig {
    /// Policies used when sessions are merged.
    pub merge: MergeConfig,
    /// Strategy for choosing a collector.
    pub fetch_strategy: FetchStrategy,
    /// Timeout for one collector to deliver every pool.
    pub collector_timeout: Duration,
    /// Optional overall deadline for a collection across all collectors.
    pub request_timeout: Option<Duration>,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            merge: MergeConfig::default(),
            fetch_strategy: FetchStrategy::default(),
            collector_timeout: Duration::from_secs(300),
            request_timeout: None,
        }
    }
}
