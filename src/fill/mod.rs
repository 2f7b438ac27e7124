// Range filling for sparse keyed series
//
// Surveillance APIs only return keys that have data. Charts and estimators need
// a complete, ordered domain: every ISO week between the first and last
// observation, every day of a requested range, or every bracket of a fixed
// category list.
//
// Filling is a pull protocol. A RangeFiller owns a cursor over its domain and
// answers, for the next original key, whether to emit that original or to
// synthesize the cursor's value first. fill_missing drives any filler; the
// weekly, daily and categorical entry points pick the filler for their domain.
//
// All violations (unsorted input, keys outside the domain, unaligned weeks)
// surface as FillError. None of them are recoverable at runtime: the caller
// built its input wrong.

mod daily;
mod filler;
mod fixed;
mod orchestrator;
mod week;

pub use daily::{fill_and_filter_daily, DayFiller};
pub use filler::{FillStep, NoopFiller, RangeFiller};
pub use fixed::{fill_age_keyed, fill_categories, FixedValuesFiller, AGE_GROUPS};
pub use orchestrator::{fill_missing, map_groups};
pub use week::{fill_grouped_weekly, fill_weekly, GroupedWeek, IsoWeekFiller, WeeklyFiller};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by fillers and the fill orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("Filler protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Filler domain exhausted while original key {key} was still unconsumed")]
    DomainExhausted { key: String },

    #[error("Key {key} is not aligned to the start of its ISO week")]
    UnalignedKey { key: String },

    #[error("Key {key} lies outside the filler domain")]
    OutOfDomain { key: String },
}

pub type Result<T> = std::result::Result<T, FillError>;

/// One `(x, y)` pair of a keyed series
///
/// `x` is the key (a week, a day, a category label, or a composite of those),
/// `y` the opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation<X, Y> {
    pub x: X,
    pub y: Y,
}

impl<X, Y> Observation<X, Y> {
    pub fn new(x: X, y: Y) -> Self {
        Self { x, y }
    }
}
