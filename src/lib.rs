//! Epifill - gap filling and proportion estimation for sparse surveillance series
//!
//! Surveillance APIs return keyed counts only where data exists. This library
//! turns those sparse series into complete, ordered domains (ISO weeks, days,
//! fixed category lists), aggregates sample records into counts and
//! proportions, and derives smoothed variant shares with Wilson confidence
//! intervals.

pub mod config;
pub mod date;
pub mod estimate;
pub mod fill;
pub mod sample_set;
pub mod selector;
pub mod smoothing;
pub mod wilson;
