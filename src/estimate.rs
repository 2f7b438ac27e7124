//! Variant proportion estimates over time
//!
//! Two pipelines feed the variant charts:
//!
//! - daily: counts of the whole population and of the variant subset are
//!   spread over every day of a range, smoothed with a centered moving
//!   average, and turned into a proportion with a Wilson interval per day
//! - weekly: raw per-week counts and proportions, gap-filled so every ISO week
//!   between the first and last observation is present
//!
//! Days after `today` are kept on the axis but carry NaN. Days with no
//! sequenced samples hold the previous proportion with the whole unit range as
//! their interval.

use crate::config::{ConfigError, EstimationConfig};
use crate::date::{UnifiedDay, YearWeekWithDay};
use crate::fill::{fill_and_filter_daily, fill_categories, fill_weekly, FillError, Observation};
use crate::sample_set::{CountAndProportion, FieldValue, SampleSet};
use crate::selector::DateRange;
use crate::smoothing::smooth_daily;
use crate::wilson::{wilson_interval, ConfidenceInterval};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::smoothing::DailyCounts;

/// Errors for the estimation pipelines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Fill failed: {0}")]
    Fill(#[from] FillError),

    #[error("Invalid estimation config: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EstimateError>;

/// Estimated variant share for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionEstimate {
    pub date: UnifiedDay,
    /// NaN for days after the reference date
    pub proportion: f64,
    pub ci: ConfidenceInterval,
}

/// Raw variant share for one ISO week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProportion {
    pub week: YearWeekWithDay,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportion: Option<f64>,
    /// Present only where the baseline count for the week is known and non-zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<ConfidenceInterval>,
}

/// One zeroed entry per day of `range`, then the counts of both sets added in
///
/// Records outside the range are ignored. With an open bound the range is
/// taken from the records of `whole`.
pub fn daily_counts(
    whole: &SampleSet,
    variant: &SampleSet,
    range: &DateRange,
) -> Result<Vec<DailyCounts>> {
    let whole_by_day = whole.count_by_day();
    let variant_by_day = variant.count_by_day();

    let days = whole_by_day.keys().map(|day| (*day, ()));
    let filled = fill_and_filter_daily(days, (), range)?;

    let series: Vec<DailyCounts> = filled
        .into_iter()
        .map(|Observation { x: day, .. }| DailyCounts {
            date: day,
            sequenced: whole_by_day.get(&day).copied().unwrap_or(0) as f64,
            variant_count: variant_by_day.get(&day).copied().unwrap_or(0) as f64,
        })
        .collect();

    let unmatched = variant_by_day
        .keys()
        .filter(|day| {
            series
                .binary_search_by_key(*day, |entry| entry.date)
                .is_err()
        })
        .count();
    if unmatched > 0 {
        tracing::debug!(unmatched, "variant days outside the daily range ignored");
    }

    Ok(series)
}

/// Smoothed daily proportions with Wilson intervals
///
/// `series` may be unsorted. The first and last `config.half_window()` days
/// have no full smoothing window and are not returned.
pub fn estimate_proportions(
    series: &[DailyCounts],
    today: UnifiedDay,
    config: &EstimationConfig,
) -> Result<Vec<ProportionEstimate>> {
    config.validate()?;

    let smoothed = smooth_daily(series, config.smoothing_window);
    if smoothed.len() < series.len() {
        tracing::debug!(
            dropped = series.len() - smoothed.len(),
            window = config.smoothing_window,
            "boundary days without a full smoothing window dropped"
        );
    }

    let mut last_proportion = 0.0;
    let mut future = 0usize;
    let estimates = smoothed
        .into_iter()
        .map(|entry| {
            if entry.date > today {
                future += 1;
                return ProportionEstimate {
                    date: entry.date,
                    proportion: f64::NAN,
                    ci: ConfidenceInterval::NAN,
                };
            }
            if entry.sequenced == 0.0 {
                return ProportionEstimate {
                    date: entry.date,
                    proportion: last_proportion,
                    ci: ConfidenceInterval::UNINFORMATIVE,
                };
            }

            let proportion = (entry.variant_count / entry.sequenced).max(0.0);
            last_proportion = proportion;
            let ci = wilson_interval(entry.variant_count, entry.sequenced, config.z_score);
            ProportionEstimate {
                date: entry.date,
                proportion,
                ci: ConfidenceInterval {
                    lower: ci.lower.max(0.0),
                    upper: ci.upper.max(0.0),
                },
            }
        })
        .collect();

    if future > 0 {
        tracing::debug!(future, %today, "days after the reference date left unestimated");
    }

    Ok(estimates)
}

/// Daily estimates for `variant` against `whole`, up to `today`
///
/// An open upper bound on `range` is closed at `today`.
///
/// # Example
/// ```
/// use epifill::config::EstimationConfig;
/// use epifill::date::UnifiedDay;
/// use epifill::estimate::estimate_time_distribution;
/// use epifill::sample_set::{RawMultiSample, SampleSet};
/// use epifill::selector::DateRange;
///
/// let day = |s| UnifiedDay::parse(s).unwrap();
/// let whole = SampleSet::from_raw_samples(
///     (1..=9).map(|d| RawMultiSample::new(format!("2021-03-0{d}"), 10)),
///     None,
/// )
/// .unwrap();
/// let variant = SampleSet::from_raw_samples(
///     (1..=9).map(|d| RawMultiSample::new(format!("2021-03-0{d}"), 5)),
///     None,
/// )
/// .unwrap();
///
/// let range = DateRange::closed(day("2021-03-01"), day("2021-03-09"));
/// let estimates = estimate_time_distribution(
///     &whole,
///     &variant,
///     &range,
///     day("2021-06-01"),
///     &EstimationConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(estimates.len(), 3);
/// assert!(estimates.iter().all(|e| e.proportion == 0.5));
/// ```
pub fn estimate_time_distribution(
    whole: &SampleSet,
    variant: &SampleSet,
    range: &DateRange,
    today: UnifiedDay,
    config: &EstimationConfig,
) -> Result<Vec<ProportionEstimate>> {
    let series = daily_counts(whole, variant, &range.until(today))?;
    estimate_proportions(&series, today, config)
}

/// Upper bound for a proportion axis
///
/// The smaller of 1.5 times the largest proportion and the largest interval
/// upper bound, so a few wide intervals do not flatten the chart. NaN points
/// are ignored; `None` if nothing is left.
pub fn plot_ceiling(estimates: &[ProportionEstimate]) -> Option<f64> {
    let by_proportion = max_ignoring_nan(estimates.iter().map(|e| e.proportion * 1.5))?;
    let by_interval = max_ignoring_nan(estimates.iter().map(|e| e.ci.upper))?;
    Some(by_proportion.min(by_interval))
}

fn max_ignoring_nan(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|value| !value.is_nan())
        .fold(None, |max, value| Some(f64::max(max.unwrap_or(value), value)))
}

/// Per-week counts and shares of `variant` within `whole`, gap-filled
///
/// Every ISO week between the first and last week of `variant` is present;
/// synthesized weeks count zero and have no proportion.
pub fn weekly_proportions(
    variant: &SampleSet,
    whole: &SampleSet,
    z: f64,
) -> Result<Vec<WeeklyProportion>> {
    let whole_by_week = whole.count_by_week();

    let observed: Vec<Observation<YearWeekWithDay, CountAndProportion>> = variant
        .proportion_by_week(whole)
        .into_iter()
        .map(|(week, entry)| Observation::new(YearWeekWithDay::from_week(week), entry))
        .collect();

    let empty = CountAndProportion {
        count: 0,
        proportion: None,
    };
    let filled = fill_weekly(observed, empty)?;

    Ok(filled
        .into_iter()
        .map(|Observation { x: week, y }| {
            let ci = y.proportion.and_then(|_| {
                whole_by_week
                    .get(&week.year_week)
                    .map(|trials| wilson_interval(y.count as f64, *trials as f64, z))
            });
            WeeklyProportion {
                week,
                count: y.count,
                proportion: y.proportion,
                ci,
            }
        })
        .collect())
}

/// Counts and shares of `variant` per age bracket, one entry per bracket
///
/// Brackets come from `config.age_groups`, in that order. Records without an
/// age are left out; a label outside the bracket list is an error.
pub fn age_proportions(
    variant: &SampleSet,
    whole: &SampleSet,
    field: &str,
    config: &EstimationConfig,
) -> Result<Vec<Observation<String, CountAndProportion>>> {
    config.validate()?;

    let observed: Vec<Observation<String, CountAndProportion>> = variant
        .proportion_by_field(field, whole)
        .into_iter()
        .filter(|(value, _)| !value.is_missing())
        .map(|(value, entry)| Observation::new(label_of(&value), entry))
        .collect();

    let empty = CountAndProportion {
        count: 0,
        proportion: None,
    };
    Ok(fill_categories(observed, &config.age_groups, empty)?)
}

fn label_of(value: &FieldValue) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
