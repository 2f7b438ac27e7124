// Configuration for proportion estimation
//
// Defaults reproduce the published charts: a 7-day centered moving average,
// 95% Wilson intervals, and the nine standard age brackets.

use crate::fill::AGE_GROUPS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Smoothing window must be odd and at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("z-score must be finite and positive, got {0}")]
    InvalidZScore(f64),

    #[error("Invalid age groups: {0}")]
    InvalidAgeGroups(String),
}

/// Configuration for smoothing and interval estimation
///
/// # Example
/// ```
/// use epifill::config::EstimationConfig;
///
/// let config = EstimationConfig::default();
/// assert_eq!(config.smoothing_window, 7);
/// assert_eq!(config.z_score, 1.96); // 95% two-sided
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Width of the centered moving average, in days
    ///
    /// Must be odd so the window has a center. The first and last
    /// `smoothing_window / 2` points of a series are dropped.
    pub smoothing_window: usize,

    /// Two-sided z-score for Wilson intervals
    ///
    /// - 1.645: 90%
    /// - 1.96 (default): 95%
    /// - 2.576: 99%
    pub z_score: f64,

    /// Ordered category domain for age-keyed series
    pub age_groups: Vec<String>,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 7,
            z_score: crate::wilson::Z_95,
            age_groups: AGE_GROUPS.iter().map(|group| group.to_string()).collect(),
        }
    }
}

impl EstimationConfig {
    /// 99% intervals
    pub fn strict() -> Self {
        Self {
            z_score: 2.576,
            ..Self::default()
        }
    }

    /// 90% intervals
    pub fn relaxed() -> Self {
        Self {
            z_score: 1.645,
            ..Self::default()
        }
    }

    /// Check invariants that the estimators rely on
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.smoothing_window == 0 || self.smoothing_window % 2 == 0 {
            return Err(ConfigError::InvalidWindow(self.smoothing_window));
        }
        if !(self.z_score.is_finite() && self.z_score > 0.0) {
            return Err(ConfigError::InvalidZScore(self.z_score));
        }
        if self.age_groups.is_empty() {
            return Err(ConfigError::InvalidAgeGroups("list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = self.age_groups.iter().find(|group| !seen.insert(*group)) {
            return Err(ConfigError::InvalidAgeGroups(format!(
                "'{duplicate}' listed twice"
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// Missing keys take their default values.
    ///
    /// # Example TOML
    /// ```toml
    /// smoothing_window = 5
    /// z_score = 2.576
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse estimation config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read estimation config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid estimation config: {}", path.as_ref().display()))
    }

    /// Smoothing radius: points dropped at each end of a series
    pub fn half_window(&self) -> usize {
        self.smoothing_window / 2
    }
}
