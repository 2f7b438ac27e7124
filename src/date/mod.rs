// Canonical calendar days and ISO weeks
//
// Raw surveillance records carry ISO-8601 date strings. Everything downstream
// (weekly aggregation, range filling, smoothing) works on the parsed forms here:
//
// - UnifiedDay: one calendar day, exposing the ISO week it belongs to
// - UnifiedIsoWeek: an (ISO year, week number) pair, ordered chronologically
// - YearWeekWithDay: the weekly key exchanged with the rendering layer
//
// Parsing happens once per distinct string through DayCache.

mod day;
mod week;

pub use day::{DayCache, UnifiedDay};
pub use week::{UnifiedIsoWeek, YearWeekWithDay};

use thiserror::Error;

/// Errors for date parsing and ISO week construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Malformed date '{0}': expected YYYY-MM-DD")]
    MalformedDate(String),

    #[error("Invalid ISO week: year {year}, week {week}")]
    InvalidIsoWeek { year: i32, week: u32 },

    #[error("Malformed year-week '{0}': expected YYYY-WW")]
    MalformedYearWeek(String),
}

pub type Result<T> = std::result::Result<T, DateError>;

#[cfg(test)]
mod tests;
