//! The fixed set of gacha pools and their static properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GachaError;

/// A gacha pool type.
///
/// The declaration order is the canonical order used everywhere a full set of
/// pools is iterated (sessions, documents, reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolType {
    /// Beginner pool, only available to new accounts (`100`).
    Beginner = 0,
    /// Permanent standard pool (`200`).
    Standard = 1,
    /// Time-limited character event pool (`301`).
    CharacterEvent = 2,
    /// Time-limited weapon event pool (`302`).
    WeaponEvent = 3,
}

struct PoolRow {
    code: &'static str,
    ceiling: u32,
    default_name: &'static str,
}

// Indexed by `PoolType as usize`; the array length pins the table to the variant count.
const POOL_TABLE: [PoolRow; PoolType::COUNT] = [
    PoolRow {
        code: "100",
        ceiling: 90,
        default_name: "Beginners' Wish",
    },
    PoolRow {
        code: "200",
        ceiling: 90,
        default_name: "Standard Wish",
    },
    PoolRow {
        code: "301",
        ceiling: 90,
        default_name: "Character Event Wish",
    },
    PoolRow {
        code: "302",
        ceiling: 80,
        default_name: "Weapon Event Wish",
    },
];

impl PoolType {
    /// Number of known pool types.
    pub const COUNT: usize = 4;

    /// All pool types in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Beginner,
        Self::Standard,
        Self::CharacterEvent,
        Self::WeaponEvent,
    ];

    /// Position of this pool in [`PoolType::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Standard => 1,
            Self::CharacterEvent => 2,
            Self::WeaponEvent => 3,
        }
    }

    const fn row(self) -> &'static PoolRow {
        &POOL_TABLE[self.index()]
    }

    /// Wire code used by the remote API and the interchange document (e.g. `"301"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.row().code
    }

    /// Number of draws after which the top rank is guaranteed.
    #[must_use]
    pub const fn ceiling(self) -> u32 {
        self.row().ceiling
    }

    /// Fallback display name used when no localized name has been collected.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        self.row().default_name
    }

    /// Look up a pool by its wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PoolType {
    type Err = GachaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim())
            .ok_or_else(|| GachaError::InvalidArg(format!("unknown pool type: {s:?}")))
    }
}

impl Serialize for PoolType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for PoolType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
