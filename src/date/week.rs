use super::{DateError, Result, UnifiedDay};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ISO-8601 week, identified by (ISO year, week number)
///
/// Stored as the Monday that opens the week, so ordering, hashing and equality
/// all follow the calendar. Serialized as `YYYY-WW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnifiedIsoWeek {
    monday: NaiveDate,
}

impl UnifiedIsoWeek {
    /// Build a week from its ISO year and week number
    ///
    /// Fails for week 0, week 53 in 52-week years, and out-of-range years.
    pub fn new(year: i32, week: u32) -> Result<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(|monday| Self { monday })
            .ok_or(DateError::InvalidIsoWeek { year, week })
    }

    /// The ISO week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        // Only the very first representable days lack a preceding Monday.
        let monday = date
            .checked_sub_days(Days::new(offset))
            .unwrap_or(NaiveDate::MIN);
        Self { monday }
    }

    /// ISO week-numbering year (may differ from the calendar year near January 1)
    pub fn year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    /// ISO week number, 1..=53
    pub fn week(&self) -> u32 {
        self.monday.iso_week().week()
    }

    /// The Monday opening this week
    pub fn first_day(&self) -> UnifiedDay {
        UnifiedDay::from_date(self.monday)
    }

    /// The following ISO week
    pub fn next(&self) -> Option<Self> {
        self.monday
            .checked_add_days(Days::new(7))
            .map(|monday| Self { monday })
    }
}

impl fmt::Display for UnifiedIsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.week())
    }
}

impl FromStr for UnifiedIsoWeek {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || DateError::MalformedYearWeek(s.to_string());
        let (year, week) = s.split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let week: u32 = week.parse().map_err(|_| malformed())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for UnifiedIsoWeek {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<UnifiedIsoWeek> for String {
    fn from(week: UnifiedIsoWeek) -> Self {
        week.to_string()
    }
}

/// Weekly key as exchanged with the data API and the rendering layer
///
/// `first_day_in_week` is carried separately from `year_week` and is what the
/// calendar-week filler enumerates over. It is expected to be the Monday of
/// `year_week`; the filler rejects keys where it is not.
///
/// # Example
/// ```
/// use epifill::date::{UnifiedIsoWeek, YearWeekWithDay};
///
/// let key = YearWeekWithDay::from_week(UnifiedIsoWeek::new(2022, 1).unwrap());
/// assert_eq!(key.first_day_in_week.to_string(), "2022-01-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearWeekWithDay {
    pub year_week: UnifiedIsoWeek,
    pub first_day_in_week: UnifiedDay,
}

impl YearWeekWithDay {
    pub fn from_week(week: UnifiedIsoWeek) -> Self {
        Self {
            year_week: week,
            first_day_in_week: week.first_day(),
        }
    }

    /// Key for the week containing `day`
    pub fn from_day(day: UnifiedDay) -> Self {
        Self::from_week(day.iso_week())
    }
}
