//! Population and date-range selectors
//!
//! A `SampleSet` is tagged with the selector describing which subset of samples
//! it holds. Selectors are plain data: fetching is done elsewhere.

use crate::date::{UnifiedDay, UnifiedIsoWeek};
use chrono::Months;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date range; an absent bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<UnifiedDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<UnifiedDay>,
}

impl DateRange {
    pub fn closed(date_from: UnifiedDay, date_to: UnifiedDay) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
        }
    }

    pub fn contains(&self, day: UnifiedDay) -> bool {
        self.date_from.map_or(true, |from| from <= day) && self.date_to.map_or(true, |to| day <= to)
    }

    /// Close the upper bound at `today` if it is open
    pub fn until(&self, today: UnifiedDay) -> Self {
        Self {
            date_from: self.date_from,
            date_to: self.date_to.or(Some(today)),
        }
    }
}

/// Named date ranges offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialDateRange {
    AllTimes,
    Y2020,
    Y2021,
    Past3M,
    Past6M,
}

impl SpecialDateRange {
    pub const ALL: [SpecialDateRange; 5] = [
        Self::AllTimes,
        Self::Y2020,
        Self::Y2021,
        Self::Past3M,
        Self::Past6M,
    ];

    /// Resolve against the current date
    ///
    /// The "past N months" ranges start at the Monday of the week that
    /// contains the day N calendar months before `today`.
    pub fn date_range(&self, today: UnifiedDay) -> DateRange {
        let fixed = |from: (i32, u32, u32), to: Option<(i32, u32, u32)>| DateRange {
            date_from: ymd(from),
            date_to: to.and_then(ymd),
        };
        match self {
            Self::AllTimes => fixed((2020, 1, 6), None),
            Self::Y2020 => fixed((2020, 1, 6), Some((2021, 1, 3))),
            Self::Y2021 => fixed((2021, 1, 4), Some((2022, 1, 3))),
            Self::Past3M => months_ago(today, 3),
            Self::Past6M => months_ago(today, 6),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AllTimes => "All times",
            Self::Y2020 => "2020",
            Self::Y2021 => "2021",
            Self::Past3M => "Past 3 months",
            Self::Past6M => "Past 6 months",
        }
    }
}

impl fmt::Display for SpecialDateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn ymd((year, month, day): (i32, u32, u32)) -> Option<UnifiedDay> {
    chrono::NaiveDate::from_ymd_opt(year, month, day).map(UnifiedDay::from_date)
}

fn months_ago(today: UnifiedDay, months: u32) -> DateRange {
    DateRange {
        date_from: today
            .date()
            .checked_sub_months(Months::new(months))
            .map(|day| UnifiedIsoWeek::containing(day).first_day()),
        date_to: None,
    }
}

/// Either an explicit range or a named one
///
/// Serialized as `{"dateRange": {...}}` or `{"mode": "Past3M"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateRangeSelector {
    #[serde(rename_all = "camelCase")]
    Fixed { date_range: DateRange },
    Special { mode: SpecialDateRange },
}

impl DateRangeSelector {
    pub fn date_range(&self, today: UnifiedDay) -> DateRange {
        match self {
            Self::Fixed { date_range } => *date_range,
            Self::Special { mode } => mode.date_range(today),
        }
    }
}

/// Variant definition: a lineage and/or a mutation set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pango_lineage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<String>,
    /// Fraction of `mutations` a sample must carry, in (0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
}

impl VariantSelector {
    pub fn lineage(pango_lineage: impl Into<String>) -> Self {
        Self {
            pango_lineage: Some(pango_lineage.into()),
            ..Self::default()
        }
    }

    /// Display name for charts
    pub fn name(&self) -> String {
        match (&self.pango_lineage, self.mutations.is_empty()) {
            (Some(lineage), true) => lineage.clone(),
            (Some(lineage), false) => format!("{lineage}+{}", self.mutations.join(",")),
            (None, false) => self.mutations.join(","),
            (None, true) => "unnamed variant".to_string(),
        }
    }
}

/// Selector describing the population a `SampleSet` was drawn from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantSelector>,
}

impl SampleSelector {
    /// Same location and dates, without the variant restriction
    ///
    /// This is the baseline ("whole") population that variant proportions
    /// are computed against.
    pub fn whole(&self) -> Self {
        Self {
            variant: None,
            ..self.clone()
        }
    }

    pub fn is_whole(&self) -> bool {
        self.variant.is_none()
    }
}
