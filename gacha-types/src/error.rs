use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PoolType;

/// Metadata field that a merge policy reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MergeField {
    /// Game region (decides the time zone of draw timestamps).
    Region,
    /// Language the record names were collected in.
    Language,
    /// Player (subject) identifier.
    Subject,
    /// Localized pool display name.
    DisplayName,
}

impl fmt::Display for MergeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Region => "region",
            Self::Language => "language",
            Self::Subject => "subject id",
            Self::DisplayName => "pool display name",
        })
    }
}

fn pool_suffix(pool: &Option<PoolType>) -> String {
    pool.map(|p| format!(" (pool {p})")).unwrap_or_default()
}

/// Unified error type for the gacha workspace.
///
/// Merge conflicts and operand mismatches come from the reconciliation engine;
/// the remaining variants are raised by loading, saving and collecting.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GachaError {
    /// A reject-mode merge policy found two different values for the same field.
    #[error("merge conflict on {field}{}: {ours:?} vs {theirs:?}", pool_suffix(.pool))]
    MergeConflict {
        /// Field whose values disagree.
        field: MergeField,
        /// Pool the conflict was found in, if it is ledger-level.
        pool: Option<PoolType>,
        /// Value held by the merge destination.
        ours: String,
        /// Value carried by the incoming operand.
        theirs: String,
    },

    /// A merge operand is not compatible with the destination.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the accepted operand.
        expected: String,
        /// Description of the operand that was supplied.
        found: String,
    },

    /// Issues with loaded or collected data (malformed document, missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A collector returned an error.
    #[error("{collector} failed: {msg}")]
    Collector {
        /// Collector name that failed.
        collector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A file or resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "game log file".
        what: String,
    },

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(String),

    /// An individual collector exceeded the configured timeout.
    #[error("collector timed out: {collector}")]
    CollectorTimeout {
        /// Collector name that timed out.
        collector: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {operation}")]
    RequestTimeout {
        /// Operation label for which the request timed out.
        operation: String,
    },

    /// All configured collectors failed; contains the individual failures.
    #[error("all collectors failed: {0:?}")]
    AllCollectorsFailed(Vec<GachaError>),
}

impl GachaError {
    /// Helper: build a `MergeConflict` for a session-level field.
    pub fn merge_conflict(
        field: MergeField,
        ours: impl Into<String>,
        theirs: impl Into<String>,
    ) -> Self {
        Self::MergeConflict {
            field,
            pool: None,
            ours: ours.into(),
            theirs: theirs.into(),
        }
    }

    /// Attach the pool to a `MergeConflict`; other variants pass through.
    #[must_use]
    pub fn in_pool(self, pool: PoolType) -> Self {
        match self {
            Self::MergeConflict {
                field,
                ours,
                theirs,
                ..
            } => Self::MergeConflict {
                field,
                pool: Some(pool),
                ours,
                theirs,
            },
            other => other,
        }
    }

    /// Helper: build a `TypeMismatch` error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Helper: build a `Collector` error with the collector name and message.
    pub fn collector(collector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Collector {
            collector: collector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `CollectorTimeout` error.
    pub fn collector_timeout(collector: impl Into<String>) -> Self {
        Self::CollectorTimeout {
            collector: collector.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(operation: impl Into<String>) -> Self {
        Self::RequestTimeout {
            operation: operation.into(),
        }
    }

    /// Returns true if the caller can act on this error and retry
    /// (different policy, different file, later collection).
    ///
    /// `TypeMismatch` is a contract violation and is never recoverable.
    /// Aggregates are recoverable if any inner failure is.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TypeMismatch { .. } | Self::InvalidArg(_) => false,
            Self::AllCollectorsFailed(inner) => inner.iter().any(Self::is_recoverable),
            _ => true,
        }
    }

    /// Flatten nested `AllCollectorsFailed` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllCollectorsFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<std::io::Error> for GachaError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(e.to_string())
        } else {
            Self::Io(e.to_string())
        }
    }
}

impl From<chrono::ParseError> for GachaError {
    fn from(e: chrono::ParseError) -> Self {
        Self::Data(e.to_string())
    }
}
