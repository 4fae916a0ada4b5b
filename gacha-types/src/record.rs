//! Draw records and their field types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{GachaError, Region};

/// Wire format of draw timestamps.
pub const DRAW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque record identifier assigned by the remote source (or an anonymised form of it).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Source-local draw timestamp with second precision.
///
/// The value carries no offset: it is wall-clock time on the game server of the
/// owning session's [`Region`]. Use [`DrawTime::in_region`] for an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawTime(NaiveDateTime);

impl DrawTime {
    /// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
    ///
    /// # Errors
    /// Returns `GachaError::Data` if the text does not match the wire format.
    pub fn parse(s: &str) -> Result<Self, GachaError> {
        NaiveDateTime::parse_from_str(s.trim(), DRAW_TIME_FORMAT)
            .map(Self)
            .map_err(|e| GachaError::Data(format!("invalid draw time {s:?}: {e}")))
    }

    /// Wrap an already-parsed wall-clock time.
    #[must_use]
    pub const fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    /// Wall-clock time as written by the server.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar day of the draw.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Absolute instant of the draw, given the region whose server wrote it.
    ///
    /// Returns `None` when the region has no known time zone.
    #[must_use]
    pub fn in_region(&self, region: &Region) -> Option<DateTime<Utc>> {
        let tz = region.timezone()?;
        tz.from_local_datetime(&self.0)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl fmt::Display for DrawTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DRAW_TIME_FORMAT))
    }
}

impl FromStr for DrawTime {
    type Err = GachaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DrawTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DrawTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Star rating of a drawn item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    /// The rarest rank; drawing one resets the pity counter.
    pub const TOP: Self = Self(5);

    /// Wrap a star count.
    #[must_use]
    pub const fn new(stars: u8) -> Self {
        Self(stars)
    }

    /// Star count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// True for the rarest rank.
    #[must_use]
    pub const fn is_top(self) -> bool {
        self.0 >= Self::TOP.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The wire format stores ranks as strings ("5"); accept bare numbers too.
impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u8),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Self(n)),
            Repr::Text(s) => s
                .trim()
                .parse::<u8>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid rank: {s:?}"))),
        }
    }
}

/// Classification of a drawn item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// A playable character.
    Character,
    /// A weapon.
    Weapon,
}

const CHARACTER_LABELS: &[&str] = &[
    "character",
    "角色",
    "キャラクター",
    "캐릭터",
    "personaje",
    "personnage",
    "figur",
    "персонаж",
    "ตัวละคร",
    "nhân vật",
    "karakter",
    "personagem",
    "personaggio",
];

const WEAPON_LABELS: &[&str] = &[
    "weapon",
    "武器",
    "무기",
    "arma",
    "arme",
    "waffe",
    "оружие",
    "อาวุธ",
    "vũ khí",
    "senjata",
    "silah",
];

impl ItemType {
    /// Classify a localized item type label as delivered by the remote API.
    ///
    /// Returns `None` for labels in unknown languages or empty labels.
    #[must_use]
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if CHARACTER_LABELS.contains(&label.as_str()) {
            Some(Self::Character)
        } else if WEAPON_LABELS.contains(&label.as_str()) {
            Some(Self::Weapon)
        } else {
            None
        }
    }

    /// English label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Weapon => "Weapon",
        }
    }
}

/// One draw event.
///
/// `item_type` keeps the localized label exactly as collected so that saved
/// documents round-trip; [`Record::item_class`] maps it to [`ItemType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Server wall-clock time of the draw.
    pub time: DrawTime,
    /// Localized item name.
    #[serde(default)]
    pub name: String,
    /// Localized item type label.
    #[serde(default)]
    pub item_type: String,
    /// Star rating.
    #[serde(rename = "rank_type")]
    pub rank: Rank,
    /// Stable record identifier. Legacy exports stored it as `RID`.
    #[serde(alias = "RID")]
    pub id: RecordId,
}

impl Record {
    /// Build a record from its parts.
    pub fn new(
        id: impl Into<RecordId>,
        time: DrawTime,
        name: impl Into<String>,
        item_type: impl Into<String>,
        rank: Rank,
    ) -> Self {
        Self {
            time,
            name: name.into(),
            item_type: item_type.into(),
            rank,
            id: id.into(),
        }
    }

    /// Ordering and dedup key: `(time, id)`.
    #[must_use]
    pub fn key(&self) -> (DrawTime, &RecordId) {
        (self.time, &self.id)
    }

    /// True if both records describe the same draw (equal dedup keys).
    #[must_use]
    pub fn same_draw(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }

    /// Classified item type, if the label is recognised.
    #[must_use]
    pub fn item_class(&self) -> Option<ItemType> {
        ItemType::classify(&self.item_type)
    }
}
