use super::{DateError, Result, UnifiedIsoWeek};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single calendar day in canonical form
///
/// Ordering is chronological. The ISO week is derived on demand, so two days of
/// the same week compare unequal but share `iso_week()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnifiedDay(NaiveDate);

impl UnifiedDay {
    /// Parse a strict `YYYY-MM-DD` string
    ///
    /// # Example
    /// ```
    /// use epifill::date::UnifiedDay;
    ///
    /// let day = UnifiedDay::parse("2022-01-05").unwrap();
    /// assert_eq!(day.iso_week().to_string(), "2022-01");
    /// assert!(UnifiedDay::parse("2022-1-5").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shape_ok {
            return Err(DateError::MalformedDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateError::MalformedDate(s.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The current day in the local timezone
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// ISO week this day falls into
    pub fn iso_week(&self) -> UnifiedIsoWeek {
        UnifiedIsoWeek::containing(self.0)
    }

    /// True if this day is the Monday that opens its ISO week
    pub fn is_week_start(&self) -> bool {
        self.0.weekday() == Weekday::Mon
    }

    /// The following calendar day, `None` past chrono's supported range
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(Self)
    }

    /// Canonical `YYYY-MM-DD` rendering
    pub fn string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for UnifiedDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for UnifiedDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Interning lookup from raw date strings to parsed days
///
/// Sample payloads repeat the same handful of dates thousands of times; each
/// distinct string is parsed once.
#[derive(Debug, Default)]
pub struct DayCache {
    days: HashMap<String, UnifiedDay>,
}

impl DayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw date string, parsing it on first sight
    pub fn get_day(&mut self, raw: &str) -> Result<UnifiedDay> {
        if let Some(day) = self.days.get(raw) {
            return Ok(*day);
        }
        let day = UnifiedDay::parse(raw)?;
        self.days.insert(raw.to_string(), day);
        Ok(day)
    }

    /// Number of distinct strings parsed so far
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
