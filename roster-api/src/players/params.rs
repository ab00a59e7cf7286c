use std::str::FromStr;

use serde::Deserialize;

use roster_core::Error;
use roster_core::validation::{birthday_bound, page_request};
use roster_database::model::{PageRequest, PlayerCriteria, PlayerOrder, Profession, Race};

/// Query string accepted by the listing and count routes. Count ignores the
/// ordering and paging fields.
///
/// Every value is kept raw so that a blank parameter counts as absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<String>,
    pub profession: Option<String>,
    /// Epoch milliseconds, inclusive.
    pub after: Option<String>,
    /// Epoch milliseconds, inclusive.
    pub before: Option<String>,
    pub banned: Option<String>,
    pub min_experience: Option<String>,
    pub max_experience: Option<String>,
    pub min_level: Option<String>,
    pub max_level: Option<String>,
    pub order: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl PlayerQuery {
    pub fn criteria(&self) -> Result<PlayerCriteria, Error> {
        Ok(PlayerCriteria {
            name: self.name.clone(),
            title: self.title.clone(),
            race: parse_param::<Race>("race", self.race.as_deref())?,
            profession: parse_param::<Profession>("profession", self.profession.as_deref())?,
            after: parse_param::<i64>("after", self.after.as_deref())?
                .map(|millis| birthday_bound(millis, "after"))
                .transpose()?,
            before: parse_param::<i64>("before", self.before.as_deref())?
                .map(|millis| birthday_bound(millis, "before"))
                .transpose()?,
            banned: parse_param("banned", self.banned.as_deref())?,
            min_experience: parse_param("minExperience", self.min_experience.as_deref())?,
            max_experience: parse_param("maxExperience", self.max_experience.as_deref())?,
            min_level: parse_param("minLevel", self.min_level.as_deref())?,
            max_level: parse_param("maxLevel", self.max_level.as_deref())?,
        })
    }

    pub fn order(&self) -> Result<PlayerOrder, Error> {
        Ok(parse_param::<PlayerOrder>("order", self.order.as_deref())?.unwrap_or_default())
    }

    pub fn page(&self) -> Result<PageRequest, Error> {
        page_request(
            parse_param("pageNumber", self.page_number.as_deref())?,
            parse_param("pageSize", self.page_size.as_deref())?,
        )
    }
}

/// Blank values count as absent; anything else must parse.
fn parse_param<T>(param: &str, raw: Option<&str>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|err| Error::bad_request(format!("invalid `{param}`: {err}"))),
        None => Ok(None),
    }
}
