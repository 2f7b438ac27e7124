// Sample aggregation
//
// A SampleSet is the immutable, date-normalized form of one API response:
// multi-count records (date, count, categorical fields) for one population.
// Charts derive everything from it: totals per field value or per ISO week,
// record groups, and proportions relative to a baseline ("whole") set.
//
// Outputs are insertion-ordered maps (first-seen key first), matching the order
// records arrived in.

mod record;

pub use record::{FieldValue, ParsedMultiSample, RawMultiSample};

use crate::date::{DateError, DayCache, UnifiedDay, UnifiedIsoWeek};
use crate::selector::SampleSelector;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use thiserror::Error;

/// Errors for sample set construction
#[derive(Error, Debug)]
pub enum SampleSetError {
    #[error("Record {index} has a malformed date: {source}")]
    MalformedDate {
        index: usize,
        #[source]
        source: DateError,
    },

    #[error("Invalid sample payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SampleSetError>;

/// Count of a subset, with its share of the baseline when known
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountAndProportion {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportion: Option<f64>,
}

/// Immutable collection of parsed sample records
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    data: Vec<ParsedMultiSample>,
    selector: Option<SampleSelector>,
}

impl SampleSet {
    /// Wrap already-parsed records
    pub fn new(data: Vec<ParsedMultiSample>, selector: Option<SampleSelector>) -> Self {
        Self { data, selector }
    }

    /// Parse raw records, resolving each distinct date string once
    ///
    /// # Errors
    /// The whole batch is rejected if any record's date fails to parse.
    ///
    /// # Example
    /// ```
    /// use epifill::sample_set::{FieldValue, RawMultiSample, SampleSet};
    ///
    /// let set = SampleSet::from_raw_samples(
    ///     vec![
    ///         RawMultiSample::new("2021-03-01", 4).with_field("division", "Bern"),
    ///         RawMultiSample::new("2021-03-02", 6).with_field("division", "Bern"),
    ///     ],
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(set.count_by_field("division")[&FieldValue::text("Bern")], 10);
    /// ```
    pub fn from_raw_samples(
        raw: impl IntoIterator<Item = RawMultiSample>,
        selector: Option<SampleSelector>,
    ) -> Result<Self> {
        let mut cache = DayCache::new();
        let data = raw
            .into_iter()
            .enumerate()
            .map(|(index, sample)| {
                let date = cache
                    .get_day(&sample.date)
                    .map_err(|source| SampleSetError::MalformedDate { index, source })?;
                Ok(ParsedMultiSample {
                    date,
                    count: sample.count,
                    fields: sample.fields,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            records = data.len(),
            distinct_dates = cache.len(),
            "built sample set"
        );

        Ok(Self { data, selector })
    }

    /// Parse a JSON array of raw records
    pub fn from_json(json: &str, selector: Option<SampleSelector>) -> Result<Self> {
        let raw: Vec<RawMultiSample> = serde_json::from_str(json)?;
        Self::from_raw_samples(raw, selector)
    }

    pub fn selector(&self) -> Option<&SampleSelector> {
        self.selector.as_ref()
    }

    pub fn get_all(&self) -> &[ParsedMultiSample] {
        &self.data
    }

    /// Number of records (not the sum of their counts)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True iff every record has a zero count
    ///
    /// A set with records that all count zero is empty; so is a set with no
    /// records at all.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|sample| sample.count == 0)
    }

    /// Total count per value of `field`
    ///
    /// Totals saturate at `u64::MAX`.
    pub fn count_by_field(&self, field: &str) -> IndexMap<FieldValue, u64> {
        self.count_by(|sample| sample.field(field).clone())
    }

    /// Total count per ISO week of the record date
    pub fn count_by_week(&self) -> IndexMap<UnifiedIsoWeek, u64> {
        self.count_by(|sample| sample.date.iso_week())
    }

    /// Total count per calendar day
    pub fn count_by_day(&self) -> IndexMap<UnifiedDay, u64> {
        self.count_by(|sample| sample.date)
    }

    /// `(value, count)` pairs sorted by value
    pub fn count_by_field_entries(&self, field: &str) -> Vec<(FieldValue, u64)> {
        let mut entries: Vec<_> = self.count_by_field(field).into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// `(week, count)` pairs in chronological order
    pub fn count_by_week_entries(&self) -> Vec<(UnifiedIsoWeek, u64)> {
        let mut entries: Vec<_> = self.count_by_week().into_iter().collect();
        entries.sort_by_key(|(week, _)| *week);
        entries
    }

    /// Records per value of `field`, in arrival order within each group
    pub fn group_by_field(&self, field: &str) -> IndexMap<FieldValue, Vec<&ParsedMultiSample>> {
        self.group_by(|sample| sample.field(field).clone())
    }

    /// Records per ISO week, in arrival order within each group
    pub fn group_by_week(&self) -> IndexMap<UnifiedIsoWeek, Vec<&ParsedMultiSample>> {
        self.group_by(|sample| sample.date.iso_week())
    }

    /// Counts per value of `field`, with the share of `whole` for the same value
    ///
    /// Output is keyed off this set: values present only in `whole` are not
    /// returned. Values missing from `whole` (or counting zero there) get a
    /// count but no proportion.
    pub fn proportion_by_field(
        &self,
        field: &str,
        whole: &SampleSet,
    ) -> IndexMap<FieldValue, CountAndProportion> {
        proportion_against(self.count_by_field(field), &whole.count_by_field(field))
    }

    /// Counts per ISO week, with the share of `whole` for the same week
    ///
    /// Same asymmetry as [`SampleSet::proportion_by_field`].
    pub fn proportion_by_week(&self, whole: &SampleSet) -> IndexMap<UnifiedIsoWeek, CountAndProportion> {
        proportion_against(self.count_by_week(), &whole.count_by_week())
    }

    fn count_by<K: Hash + Eq>(&self, key: impl Fn(&ParsedMultiSample) -> K) -> IndexMap<K, u64> {
        let mut counts = IndexMap::new();
        for sample in &self.data {
            let total = counts.entry(key(sample)).or_insert(0u64);
            *total = total.saturating_add(sample.count);
        }
        counts
    }

    fn group_by<K: Hash + Eq>(
        &self,
        key: impl Fn(&ParsedMultiSample) -> K,
    ) -> IndexMap<K, Vec<&ParsedMultiSample>> {
        let mut groups: IndexMap<K, Vec<&ParsedMultiSample>> = IndexMap::new();
        for sample in &self.data {
            groups.entry(key(sample)).or_default().push(sample);
        }
        groups
    }
}

fn proportion_against<K: Hash + Eq>(
    part: IndexMap<K, u64>,
    whole: &IndexMap<K, u64>,
) -> IndexMap<K, CountAndProportion> {
    part.into_iter()
        .map(|(key, count)| {
            let proportion = whole
                .get(&key)
                .filter(|whole_count| **whole_count > 0)
                .map(|whole_count| count as f64 / *whole_count as f64);
            (key, CountAndProportion { count, proportion })
        })
        .collect()
}
