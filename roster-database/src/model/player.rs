use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use roster_utils::parse::parse_variant;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl Race {
    pub const ALL: [(&'static str, Race); 7] = [
        ("HUMAN", Race::Human),
        ("DWARF", Race::Dwarf),
        ("ELF", Race::Elf),
        ("GIANT", Race::Giant),
        ("ORC", Race::Orc),
        ("TROLL", Race::Troll),
        ("HOBBIT", Race::Hobbit),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Race::Human => "HUMAN",
            Race::Dwarf => "DWARF",
            Race::Elf => "ELF",
            Race::Giant => "GIANT",
            Race::Orc => "ORC",
            Race::Troll => "TROLL",
            Race::Hobbit => "HOBBIT",
        }
    }
}

impl FromStr for Race {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_variant(raw, &Self::ALL).ok_or_else(|| UnknownVariant {
            kind: "race",
            value: raw.to_owned(),
        })
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl Profession {
    pub const ALL: [(&'static str, Profession); 8] = [
        ("WARRIOR", Profession::Warrior),
        ("ROGUE", Profession::Rogue),
        ("SORCERER", Profession::Sorcerer),
        ("CLERIC", Profession::Cleric),
        ("PALADIN", Profession::Paladin),
        ("NAZGUL", Profession::Nazgul),
        ("WARLOCK", Profession::Warlock),
        ("DRUID", Profession::Druid),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Profession::Warrior => "WARRIOR",
            Profession::Rogue => "ROGUE",
            Profession::Sorcerer => "SORCERER",
            Profession::Cleric => "CLERIC",
            Profession::Paladin => "PALADIN",
            Profession::Nazgul => "NAZGUL",
            Profession::Warlock => "WARLOCK",
            Profession::Druid => "DRUID",
        }
    }
}

impl FromStr for Profession {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_variant(raw, &Self::ALL).ok_or_else(|| UnknownVariant {
            kind: "profession",
            value: raw.to_owned(),
        })
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored player as returned to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub birthday: DateTime<Utc>,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
    pub banned: bool,
}

/// A validated player that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: DateTime<Utc>,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
    pub banned: bool,
}

impl PlayerRecord {
    pub fn into_player(self, id: i64) -> Player {
        Player {
            id,
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            birthday: self.birthday,
            experience: self.experience,
            level: self.level,
            until_next_level: self.until_next_level,
            banned: self.banned,
        }
    }
}

/// Validated changes for an existing player. `None` leaves a column untouched.
///
/// `level` and `until_next_level` are only set together with `experience`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<DateTime<Utc>>,
    pub experience: Option<i32>,
    pub level: Option<i32>,
    pub until_next_level: Option<i32>,
    pub banned: Option<bool>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name.clone_from(name);
        }
        if let Some(title) = &self.title {
            player.title.clone_from(title);
        }
        if let Some(race) = self.race {
            player.race = race;
        }
        if let Some(profession) = self.profession {
            player.profession = profession;
        }
        if let Some(birthday) = self.birthday {
            player.birthday = birthday;
        }
        if let Some(experience) = self.experience {
            player.experience = experience;
        }
        if let Some(level) = self.level {
            player.level = level;
        }
        if let Some(until_next_level) = self.until_next_level {
            player.until_next_level = until_next_level;
        }
        if let Some(banned) = self.banned {
            player.banned = banned;
        }
    }
}

/// Creation payload. Every field is optional here so that a missing field is
/// reported as a validation failure instead of a decode error.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    /// Epoch milliseconds.
    pub birthday: Option<i64>,
    pub experience: Option<i32>,
    pub banned: Option<bool>,
}

/// Per-field presence in a partial update body.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
    /// The key was not sent.
    Missing,
    /// The key was sent as `null`.
    Null,
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Missing and null both mean "leave unchanged".
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Missing | Field::Null => None,
        }
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Present(value),
            None => Field::Null,
        })
    }
}

/// Partial update payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerPatch {
    pub name: Field<String>,
    pub title: Field<String>,
    pub race: Field<Race>,
    pub profession: Field<Profession>,
    /// Epoch milliseconds.
    pub birthday: Field<i64>,
    pub experience: Field<i32>,
    pub banned: Field<bool>,
}

impl PlayerPatch {
    /// Names of the fields that were sent with a non-null value.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_present() {
            fields.push("name");
        }
        if self.title.is_present() {
            fields.push("title");
        }
        if self.race.is_present() {
            fields.push("race");
        }
        if self.profession.is_present() {
            fields.push("profession");
        }
        if self.birthday.is_present() {
            fields.push("birthday");
        }
        if self.experience.is_present() {
            fields.push("experience");
        }
        if self.banned.is_present() {
            fields.push("banned");
        }
        fields
    }
}
