use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Utc};

/// Calendar years a birthday may fall in.
pub const BIRTHDAY_YEARS: RangeInclusive<i32> = 2000..=3000;

/// Convert epoch milliseconds into a UTC timestamp.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Whether the UTC calendar year of `at` lies within `years`.
pub fn year_within(at: &DateTime<Utc>, years: &RangeInclusive<i32>) -> bool {
    years.contains(&at.year())
}
