use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use roster_utils::parse::parse_variant;

use crate::model::player::{Player, Profession, Race, UnknownVariant};

/// Optional listing criteria as received from a caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerCriteria {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

/// Inclusive bounds where either side may be open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd> Bounds<T> {
    /// `None` when both sides are open.
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().is_none_or(|min| value >= min)
            && self.max.as_ref().is_none_or(|max| value <= max)
    }
}

/// One filter condition over a player.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    NameContains(String),
    TitleContains(String),
    RaceIs(Race),
    ProfessionIs(Profession),
    BirthdayWithin(Bounds<DateTime<Utc>>),
    BannedIs(bool),
    ExperienceWithin(Bounds<i32>),
    LevelWithin(Bounds<i32>),
}

impl Predicate {
    pub fn matches(&self, player: &Player) -> bool {
        match self {
            Predicate::NameContains(needle) => player.name.contains(needle.as_str()),
            Predicate::TitleContains(needle) => player.title.contains(needle.as_str()),
            Predicate::RaceIs(race) => player.race == *race,
            Predicate::ProfessionIs(profession) => player.profession == *profession,
            Predicate::BirthdayWithin(bounds) => bounds.contains(&player.birthday),
            Predicate::BannedIs(banned) => player.banned == *banned,
            Predicate::ExperienceWithin(bounds) => bounds.contains(&player.experience),
            Predicate::LevelWithin(bounds) => bounds.contains(&player.level),
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::NameContains(needle) => {
                builder.push("strpos(name, ");
                builder.push_bind(needle.clone());
                builder.push(") > 0");
            }
            Predicate::TitleContains(needle) => {
                builder.push("strpos(title, ");
                builder.push_bind(needle.clone());
                builder.push(") > 0");
            }
            Predicate::RaceIs(race) => {
                builder.push("race = ");
                builder.push_bind(race.as_str());
            }
            Predicate::ProfessionIs(profession) => {
                builder.push("profession = ");
                builder.push_bind(profession.as_str());
            }
            Predicate::BirthdayWithin(bounds) => push_bounds(builder, "birthday", *bounds),
            Predicate::BannedIs(banned) => {
                builder.push("banned = ");
                builder.push_bind(*banned);
            }
            Predicate::ExperienceWithin(bounds) => push_bounds(builder, "experience", *bounds),
            Predicate::LevelWithin(bounds) => push_bounds(builder, "level", *bounds),
        }
    }
}

fn push_bounds<T>(builder: &mut QueryBuilder<'_, Postgres>, column: &str, bounds: Bounds<T>)
where
    T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
{
    match (bounds.min, bounds.max) {
        (Some(min), Some(max)) => {
            builder.push(column);
            builder.push(" BETWEEN ");
            builder.push_bind(min);
            builder.push(" AND ");
            builder.push_bind(max);
        }
        (Some(min), None) => {
            builder.push(column);
            builder.push(" >= ");
            builder.push_bind(min);
        }
        (None, Some(max)) => {
            builder.push(column);
            builder.push(" <= ");
            builder.push_bind(max);
        }
        // Bounds::new never builds a fully open range.
        (None, None) => {
            builder.push("TRUE");
        }
    }
}

/// Predicates combined with logical AND. An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerFilter {
    predicates: Vec<Predicate>,
}

impl PlayerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_criteria(criteria: PlayerCriteria) -> Self {
        let mut filter = Self::new();

        if let Some(name) = criteria.name {
            filter = filter.and(Predicate::NameContains(name));
        }
        if let Some(title) = criteria.title {
            filter = filter.and(Predicate::TitleContains(title));
        }
        if let Some(race) = criteria.race {
            filter = filter.and(Predicate::RaceIs(race));
        }
        if let Some(profession) = criteria.profession {
            filter = filter.and(Predicate::ProfessionIs(profession));
        }
        if let Some(bounds) = Bounds::new(criteria.after, criteria.before) {
            filter = filter.and(Predicate::BirthdayWithin(bounds));
        }
        if let Some(banned) = criteria.banned {
            filter = filter.and(Predicate::BannedIs(banned));
        }
        if let Some(bounds) = Bounds::new(criteria.min_experience, criteria.max_experience) {
            filter = filter.and(Predicate::ExperienceWithin(bounds));
        }
        if let Some(bounds) = Bounds::new(criteria.min_level, criteria.max_level) {
            filter = filter.and(Predicate::LevelWithin(bounds));
        }

        filter
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, player: &Player) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(player))
    }

    /// Append a `WHERE` clause for every predicate; nothing when empty.
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (idx, predicate) in self.predicates.iter().enumerate() {
            builder.push(if idx == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(builder);
        }
    }
}

/// Sort field for listings. Ties are always broken by id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl PlayerOrder {
    pub const ALL: [(&'static str, PlayerOrder); 5] = [
        ("ID", PlayerOrder::Id),
        ("NAME", PlayerOrder::Name),
        ("EXPERIENCE", PlayerOrder::Experience),
        ("BIRTHDAY", PlayerOrder::Birthday),
        ("LEVEL", PlayerOrder::Level),
    ];

    pub fn column(self) -> &'static str {
        match self {
            PlayerOrder::Id => "id",
            PlayerOrder::Name => "name",
            PlayerOrder::Experience => "experience",
            PlayerOrder::Birthday => "birthday",
            PlayerOrder::Level => "level",
        }
    }

    pub fn compare(self, left: &Player, right: &Player) -> Ordering {
        let primary = match self {
            PlayerOrder::Id => Ordering::Equal,
            PlayerOrder::Name => left.name.cmp(&right.name),
            PlayerOrder::Experience => left.experience.cmp(&right.experience),
            PlayerOrder::Birthday => left.birthday.cmp(&right.birthday),
            PlayerOrder::Level => left.level.cmp(&right.level),
        };
        primary.then(left.id.cmp(&right.id))
    }

    /// Names sort by byte order (`COLLATE "C"`), the same order `compare` uses.
    pub fn push_order_by(self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" ORDER BY ");
        if self != PlayerOrder::Id {
            builder.push(self.column());
            if self == PlayerOrder::Name {
                builder.push(" COLLATE \"C\"");
            }
            builder.push(" ASC, ");
        }
        builder.push("id ASC");
    }
}

impl FromStr for PlayerOrder {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_variant(raw, &Self::ALL).ok_or_else(|| UnknownVariant {
            kind: "order",
            value: raw.to_owned(),
        })
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 3;
pub const MAX_PAGE_SIZE: u32 = 1_000;

/// Zero-based page of a sorted listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn offset(self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }

    /// Apply the page to an already sorted slice.
    pub fn slice<T: Clone>(self, sorted: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        sorted
            .iter()
            .skip(start)
            .take(self.size as usize)
            .cloned()
            .collect()
    }
}
