//! Centered moving-average smoothing
//!
//! Boundary points without a full window are dropped rather than averaged
//! over a shrunken window: `n` inputs yield `max(n - (window - 1), 0)`
//! outputs, each aligned to the center of its window.

use crate::date::UnifiedDay;
use serde::{Deserialize, Serialize};

/// Per-day sample counts; fractional once smoothed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounts {
    pub date: UnifiedDay,
    /// All sequenced samples (the trials)
    pub sequenced: f64,
    /// Samples matching the variant (the successes)
    pub variant_count: f64,
}

impl DailyCounts {
    pub fn zero(date: UnifiedDay) -> Self {
        Self {
            date,
            sequenced: 0.0,
            variant_count: 0.0,
        }
    }
}

/// Mean of every full window of `window` consecutive values
///
/// A zero window yields no output.
///
/// # Example
/// ```
/// use epifill::smoothing::centered_moving_average;
///
/// let smoothed = centered_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
/// assert_eq!(smoothed, vec![2.0, 3.0, 4.0]);
/// ```
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|slice| slice.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Smooth both count columns of a daily series
///
/// The series is ordered by date first. Each output keeps the date of its
/// window's center.
pub fn smooth_daily(series: &[DailyCounts], window: usize) -> Vec<DailyCounts> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|entry| entry.date);

    let sequenced: Vec<f64> = sorted.iter().map(|entry| entry.sequenced).collect();
    let variant: Vec<f64> = sorted.iter().map(|entry| entry.variant_count).collect();

    let smoothed_sequenced = centered_moving_average(&sequenced, window);
    let smoothed_variant = centered_moving_average(&variant, window);

    let half = window / 2;
    let smoothed: Vec<DailyCounts> = sorted
        .iter()
        .skip(half)
        .zip(smoothed_sequenced.into_iter().zip(smoothed_variant))
        .map(|(entry, (sequenced, variant_count))| DailyCounts {
            date: entry.date,
            sequenced,
            variant_count,
        })
        .collect();

    tracing::trace!(
        input = series.len(),
        output = smoothed.len(),
        window,
        "smoothed daily series"
    );

    smoothed
}
