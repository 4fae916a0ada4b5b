use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Game server region as reported by the remote API (e.g. `cn_gf01`, `os_euro`).
///
/// The region decides which time zone draw timestamps were written in. The
/// empty string is a region of its own: documents saved without infos carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Wrap a region code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Raw region code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no region is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Server time zone for this region; `None` for unknown or empty codes.
    ///
    /// Server clocks use fixed offsets without daylight saving.
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        match self.0.as_str() {
            "cn_gf01" | "cn_qd01" => Some(chrono_tz::Asia::Shanghai),
            "os_asia" | "os_cht" => Some(chrono_tz::Etc::GMTMinus8),
            "os_euro" => Some(chrono_tz::Etc::GMTMinus1),
            "os_usa" => Some(chrono_tz::Etc::GMTPlus5),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
