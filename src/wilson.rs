//! Wilson score confidence intervals for binomial proportions
//!
//! Used for variant shares: `successes` are variant-positive samples, `trials`
//! all sequenced samples. Unlike the normal approximation, the Wilson interval
//! stays inside [0, 1] and remains informative near 0% and 100%.
//!
//! Inputs may be fractional (smoothed counts), so the core computation takes
//! `f64`; [`wilson_interval_counts`] is the integer entry point.

use serde::{Deserialize, Serialize};

/// Two-sided z-score for a 95% interval
pub const Z_95: f64 = 1.96;

/// Interval bounds, both within [0, 1] unless explicitly NaN
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Interval carrying no information: the whole unit range
    pub const UNINFORMATIVE: Self = Self {
        lower: 0.0,
        upper: 1.0,
    };

    /// Placeholder for points that are not estimated
    pub const NAN: Self = Self {
        lower: f64::NAN,
        upper: f64::NAN,
    };

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn is_nan(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }
}

/// Wilson score interval for `successes` out of `trials`
///
/// `successes` is clamped into `[0, trials]`. With no trials the interval is
/// [`ConfidenceInterval::UNINFORMATIVE`]. Zero successes pin the lower bound
/// to exactly 0 and full successes pin the upper bound to exactly 1; any other
/// bound is clamped to [0, 1], which absorbs floating-point underflow.
///
/// # Example
/// ```
/// use epifill::wilson::{wilson_interval, Z_95};
///
/// let ci = wilson_interval(8.0, 10.0, Z_95);
/// assert!(ci.lower < 0.8 && 0.8 < ci.upper);
/// assert!((ci.lower - 0.4902).abs() < 1e-4);
/// ```
pub fn wilson_interval(successes: f64, trials: f64, z: f64) -> ConfidenceInterval {
    if !(trials.is_finite() && trials > 0.0) {
        return ConfidenceInterval::UNINFORMATIVE;
    }
    let z = if z.is_finite() && z > 0.0 { z } else { Z_95 };
    let n = trials;
    let k = successes.clamp(0.0, n);
    let p_hat = k / n;
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p_hat + z2 / (2.0 * n)) / denom;
    let radius = z * (p_hat * (1.0 - p_hat) / n + z2 / (4.0 * n * n)).sqrt() / denom;

    let lower = if k == 0.0 {
        0.0
    } else {
        (center - radius).clamp(0.0, 1.0)
    };
    let upper = if k == n {
        1.0
    } else {
        (center + radius).clamp(0.0, 1.0)
    };

    ConfidenceInterval { lower, upper }
}

/// 95% Wilson interval for integer counts
pub fn wilson_interval_counts(successes: u64, trials: u64) -> ConfidenceInterval {
    wilson_interval(successes as f64, trials as f64, Z_95)
}
