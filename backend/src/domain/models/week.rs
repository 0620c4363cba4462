//! Week identifiers of the form `YYYY-WW`.
//!
//! Week numbers follow the storefront convention: week 1 is the (possibly
//! partial) Sunday-started week holding January 1st. Stepping backwards
//! across a year boundary assumes a 52-week year, which is an approximation
//! and not calendar-exact. Callers needing precise ISO week arithmetic
//! across year boundaries must not rely on it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest week number the week-number convention can produce
/// (a 366-day year starting on a Saturday).
pub const MAX_WEEK_NUMBER: u32 = 54;

/// Weeks assumed per year when stepping back across a year boundary
const APPROXIMATE_WEEKS_PER_YEAR: u32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

/// Monday-to-Sunday span of a week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub monday: NaiveDate,
    pub friday: NaiveDate,
    pub sunday: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeekIdError {
    #[error("Invalid week id format: {0} (expected YYYY-WW)")]
    InvalidFormat(String),
    #[error("Week number {0} out of range 1-54")]
    WeekOutOfRange(u32),
    #[error("Year {0} is out of the supported calendar range")]
    YearOutOfRange(i32),
}

impl WeekId {
    pub fn new(year: i32, week: u32) -> Result<Self, WeekIdError> {
        if week == 0 || week > MAX_WEEK_NUMBER {
            return Err(WeekIdError::WeekOutOfRange(week));
        }
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(WeekIdError::YearOutOfRange(year));
        }
        Ok(Self { year, week })
    }

    /// Week id holding the given date
    pub fn containing(date: NaiveDate) -> Self {
        let day_of_year = date.ordinal0();
        let weekday = date.weekday().num_days_from_sunday();
        let jan1_weekday = (weekday + 7 - day_of_year % 7) % 7;
        let week = (day_of_year + jan1_weekday + 1 + 6) / 7;
        Self {
            year: date.year(),
            week,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// The preceding week, rolling into the previous year as week 52 + offset
    pub fn previous(&self) -> Self {
        if self.week > 1 {
            Self {
                year: self.year,
                week: self.week - 1,
            }
        } else {
            Self {
                year: self.year - 1,
                week: APPROXIMATE_WEEKS_PER_YEAR,
            }
        }
    }

    /// The `weeks` ids immediately before this one, most recent first
    pub fn recent(&self, weeks: u32) -> Vec<WeekId> {
        let mut ids = Vec::with_capacity(weeks as usize);
        let mut current = *self;
        for _ in 0..weeks {
            current = current.previous();
            ids.push(current);
        }
        ids
    }

    /// Monday-start span for this week: the first Monday on or after
    /// January 1st begins week 1.
    pub fn date_range(&self) -> WeekRange {
        // Construction guarantees January 1st exists for `year`
        let jan1 = NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or_default();
        let days_to_first_monday = (8 - jan1.weekday().num_days_from_sunday() as i64) % 7;
        let first_monday = jan1 + Duration::days(days_to_first_monday);
        let monday = first_monday + Duration::weeks(self.week as i64 - 1);

        WeekRange {
            monday,
            friday: monday + Duration::days(4),
            sunday: monday + Duration::days(6),
        }
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = WeekIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, week) = s
            .split_once('-')
            .ok_or_else(|| WeekIdError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| WeekIdError::InvalidFormat(s.to_string()))?;
        let week: u32 = week
            .parse()
            .map_err(|_| WeekIdError::InvalidFormat(s.to_string()))?;
        WeekId::new(year, week)
    }
}

impl TryFrom<String> for WeekId {
    type Error = WeekIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(id: WeekId) -> Self {
        id.to_string()
    }
}
