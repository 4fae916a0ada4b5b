use gacha_core::{DrawTime, PoolType, Rank, RawDraw, RecordId};

pub const SUBJECT: &str = "100000001";

// (id, time, name, item_type, rank), oldest first
type Row = (&'static str, &'static str, &'static str, &'static str, u8);

const BEGINNER: &[Row] = &[
    ("1601100000000000001", "2020-09-28 12:01:10", "Noelle", "Character", 4),
    ("1601100000000000002", "2020-09-28 12:02:45", "Cool Steel", "Weapon", 3),
];

const STANDARD: &[Row] = &[
    ("1603200000000000001", "2020-10-02 20:15:03", "Slingshot", "Weapon", 3),
    ("1603200000000000002", "2020-10-02 20:15:03", "Amber", "Character", 4),
    ("1603200000000000003", "2020-10-02 20:15:03", "Harbinger of Dawn", "Weapon", 3),
    ("1603200000000000004", "2020-10-05 09:40:12", "Diluc", "Character", 5),
];

const CHARACTER_EVENT: &[Row] = &[
    ("1601300000000000001", "2020-10-01 18:30:00", "Debate Club", "Weapon", 3),
    ("1601300000000000002", "2020-10-01 18:30:00", "Sucrose", "Character", 4),
    ("1601300000000000003", "2020-10-01 18:30:00", "Ferrous Shadow", "Weapon", 3),
    ("1601300000000000004", "2020-10-01 18:30:00", "Venti", "Character", 5),
    ("1601300000000000005", "2020-10-01 18:30:00", "Black Tassel", "Weapon", 3),
    ("1601300000000000006", "2020-10-01 18:30:00", "Raven Bow", "Weapon", 3),
    ("1601300000000000007", "2020-10-01 18:30:00", "Xiangling", "Character", 4),
    ("1601300000000000008", "2020-10-01 18:30:00", "Thrilling Tales of Dragon Slayers", "Weapon", 3),
    ("1601300000000000009", "2020-10-01 18:30:00", "Magic Guide", "Weapon", 3),
    ("1601300000000000010", "2020-10-01 18:30:00", "Emerald Orb", "Weapon", 3),
    ("1601300000000000011", "2020-10-25 21:07:44", "Klee", "Character", 5),
    ("1601300000000000012", "2020-10-26 10:00:01", "Sharpshooter's Oath", "Weapon", 3),
];

const WEAPON_EVENT: &[Row] = &[
    ("1601400000000000001", "2020-10-03 15:22:09", "The Flute", "Weapon", 4),
];

const fn rows(pool: PoolType) -> &'static [Row] {
    match pool {
        PoolType::Beginner => BEGINNER,
        PoolType::Standard => STANDARD,
        PoolType::CharacterEvent => CHARACTER_EVENT,
        PoolType::WeaponEvent => WEAPON_EVENT,
    }
}

/// Draws of `pool` for `subject`, newest first like the remote API.
pub fn by_pool(subject: &str, pool: PoolType) -> Vec<RawDraw> {
    rows(pool)
        .iter()
        .rev()
        .filter_map(|&(id, time, name, item_type, rank)| {
            Some(RawDraw {
                uid: subject.to_string(),
                gacha_type: pool.code().to_string(),
                item_id: String::new(),
                count: "1".to_string(),
                time: DrawTime::parse(time).ok()?,
                name: name.to_string(),
                lang: "en-us".to_string(),
                item_type: item_type.to_string(),
                rank_type: Rank::new(rank),
                id: RecordId::new(id),
            })
        })
        .collect()
}
