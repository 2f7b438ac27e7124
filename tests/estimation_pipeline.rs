//! End-to-end tests: raw JSON samples to chart-ready estimates
//!
//! Set RUST_LOG=epifill=debug to see the pipeline's tracing output.

use epifill::config::EstimationConfig;
use epifill::date::UnifiedDay;
use epifill::estimate::{
    age_proportions, daily_counts, estimate_time_distribution, plot_ceiling, weekly_proportions,
};
use epifill::sample_set::{FieldValue, SampleSet};
use epifill::selector::{DateRange, DateRangeSelector, SampleSelector, SpecialDateRange, VariantSelector};
use epifill::smoothing::centered_moving_average;
use epifill::wilson::{wilson_interval_counts, ConfidenceInterval, Z_95};
use proptest::prelude::*;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn day(s: &str) -> UnifiedDay {
    UnifiedDay::parse(s).unwrap()
}

fn selector() -> SampleSelector {
    SampleSelector {
        location: Some("Switzerland".to_string()),
        date_range: Some(DateRangeSelector::Special {
            mode: SpecialDateRange::Y2021,
        }),
        variant: Some(VariantSelector::lineage("B.1.1.7")),
    }
}

/// Two weeks of daily data with a gap on 2021-03-06/07
fn whole_json() -> String {
    let days = [1, 2, 3, 4, 5, 8, 9, 10, 11, 12, 13, 14];
    let records: Vec<String> = days
        .iter()
        .map(|d| {
            format!(
                r#"{{"date": "2021-03-{d:02}", "count": 20, "age": "30-39"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn variant_json() -> String {
    let days = [1, 2, 3, 4, 5, 8, 9, 10, 11, 12, 13, 14];
    let records: Vec<String> = days
        .iter()
        .map(|d| {
            format!(
                r#"{{"date": "2021-03-{d:02}", "count": 5, "age": "30-39"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

#[test]
fn test_time_distribution_from_json() {
    init_tracing();
    let whole = SampleSet::from_json(&whole_json(), Some(selector().whole())).unwrap();
    let variant = SampleSet::from_json(&variant_json(), Some(selector())).unwrap();

    let today = day("2021-03-09");
    let year = selector().date_range.unwrap().date_range(today);
    assert!(year.contains(day("2021-03-01")) && year.contains(day("2021-03-14")));

    let range = DateRange::closed(day("2021-03-01"), day("2021-03-14"));

    let estimates =
        estimate_time_distribution(&whole, &variant, &range, today, &EstimationConfig::default())
            .unwrap();

    // 14 days, 3 dropped at each end
    assert_eq!(estimates.len(), 8);
    assert_eq!(estimates[0].date, day("2021-03-04"));

    for estimate in &estimates {
        if estimate.date > today {
            assert!(estimate.proportion.is_nan());
            assert!(estimate.ci.is_nan());
        } else {
            // every window has the same 1:4 ratio
            assert!((estimate.proportion - 0.25).abs() < 1e-12);
            assert!(estimate.ci.contains(estimate.proportion));
            assert!(estimate.ci.lower >= 0.0 && estimate.ci.upper <= 1.0);
        }
    }
    assert_eq!(estimates.iter().filter(|e| e.proportion.is_nan()).count(), 2);

    let ceiling = plot_ceiling(&estimates).unwrap();
    assert!(ceiling > 0.25 && ceiling <= 0.375 + 1e-12);
}

#[test]
fn test_daily_counts_include_gap_days() {
    let whole = SampleSet::from_json(&whole_json(), None).unwrap();
    let variant = SampleSet::from_json(&variant_json(), None).unwrap();
    let range = DateRange::closed(day("2021-03-01"), day("2021-03-14"));

    let series = daily_counts(&whole, &variant, &range).unwrap();
    assert_eq!(series.len(), 14);
    let gap = series.iter().find(|entry| entry.date == day("2021-03-06")).unwrap();
    assert_eq!(gap.sequenced, 0.0);
    assert_eq!(gap.variant_count, 0.0);
    assert_eq!(series.iter().map(|entry| entry.sequenced).sum::<f64>(), 240.0);
}

#[test]
fn test_weekly_and_age_views() {
    init_tracing();
    let whole = SampleSet::from_json(&whole_json(), None).unwrap();
    let variant = SampleSet::from_json(&variant_json(), None).unwrap();

    let weeks = weekly_proportions(&variant, &whole, Z_95).unwrap();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].count, 25);
    assert_eq!(weeks[0].proportion, Some(0.25));
    assert_eq!(weeks[0].ci, Some(wilson_interval_counts(25, 100)));
    assert_eq!(weeks[1].count, 35);

    let ages = age_proportions(&variant, &whole, "age", &EstimationConfig::default()).unwrap();
    assert_eq!(ages.len(), 9);
    let populated: Vec<_> = ages.iter().filter(|entry| entry.y.count > 0).collect();
    assert_eq!(populated.len(), 1);
    assert_eq!(populated[0].x, "30-39");
    assert_eq!(populated[0].y.proportion, Some(0.25));

    assert_eq!(
        variant.count_by_field_entries("age"),
        vec![(FieldValue::text("30-39"), 60)]
    );
}

#[test]
fn test_config_file_drives_estimation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "smoothing_window = 3").unwrap();
    writeln!(file, "z_score = 2.576").unwrap();
    let config = EstimationConfig::from_toml_file(file.path()).unwrap();

    let whole = SampleSet::from_json(&whole_json(), None).unwrap();
    let variant = SampleSet::from_json(&variant_json(), None).unwrap();
    let range = DateRange::closed(day("2021-03-01"), day("2021-03-14"));
    let today = day("2021-12-31");

    let narrow = estimate_time_distribution(&whole, &variant, &range, today, &config).unwrap();
    assert_eq!(narrow.len(), 12);

    let same_window = EstimationConfig {
        smoothing_window: 3,
        ..EstimationConfig::default()
    };
    let default = estimate_time_distribution(&whole, &variant, &range, today, &same_window).unwrap();
    // a 99% interval is wider than a 95% one on the same center day
    let center = day("2021-03-04");
    let strict = narrow.iter().find(|e| e.date == center).unwrap();
    let normal = default.iter().find(|e| e.date == center).unwrap();
    assert!(strict.ci.width() > normal.ci.width());
}

#[test]
fn test_zero_trial_days_hold_previous_value() {
    // samples only in the first week; the tail has no trials at all
    let whole = SampleSet::from_json(
        r#"[{"date": "2021-03-01", "count": 7}, {"date": "2021-03-01", "count": 7}]"#,
        None,
    )
    .unwrap();
    let variant =
        SampleSet::from_json(r#"[{"date": "2021-03-01", "count": 7}]"#, None).unwrap();
    let range = DateRange::closed(day("2021-03-01"), day("2021-03-20"));
    let config = EstimationConfig::default();

    let estimates =
        estimate_time_distribution(&whole, &variant, &range, day("2021-12-31"), &config).unwrap();
    assert_eq!(estimates.len(), 14);
    assert_eq!(estimates[0].proportion, 0.5);
    let tail = estimates.last().unwrap();
    assert_eq!(tail.proportion, 0.5);
    assert_eq!(tail.ci, ConfidenceInterval::UNINFORMATIVE);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_wilson_bounds_bracket_proportion(trials in 1u64..10_000, share in 0.0f64..=1.0) {
        let successes = ((trials as f64) * share).round() as u64;
        let ci = wilson_interval_counts(successes, trials);
        let p = successes as f64 / trials as f64;

        prop_assert!(0.0 <= ci.lower);
        prop_assert!(ci.lower <= p + 1e-12);
        prop_assert!(p <= ci.upper + 1e-12);
        prop_assert!(ci.upper <= 1.0);
    }

    #[test]
    fn prop_smoothing_length(values in prop::collection::vec(0.0f64..1000.0, 0..60)) {
        let smoothed = centered_moving_average(&values, 7);
        prop_assert_eq!(smoothed.len(), values.len().saturating_sub(6));
    }

    #[test]
    fn prop_proportion_matches_baseline(
        counts in prop::collection::vec((0u64..50, 0u64..50, any::<bool>()), 1..12),
    ) {
        // one record per division; the baseline may lack some divisions
        let mut part = Vec::new();
        let mut whole = Vec::new();
        for (index, (part_count, whole_count, in_baseline)) in counts.iter().enumerate() {
            part.push(format!(
                r#"{{"date": "2021-03-01", "count": {part_count}, "division": "d{index}"}}"#
            ));
            if *in_baseline {
                whole.push(format!(
                    r#"{{"date": "2021-03-01", "count": {whole_count}, "division": "d{index}"}}"#
                ));
            }
        }
        let part = SampleSet::from_json(&format!("[{}]", part.join(",")), None).unwrap();
        let whole = SampleSet::from_json(&format!("[{}]", whole.join(",")), None).unwrap();

        let proportions = part.proportion_by_field("division", &whole);
        prop_assert_eq!(proportions.len(), counts.len());
        for (index, (part_count, whole_count, in_baseline)) in counts.iter().enumerate() {
            let entry = proportions[&FieldValue::text(format!("d{index}"))];
            prop_assert_eq!(entry.count, *part_count);
            let expected = (*in_baseline && *whole_count > 0)
                .then(|| *part_count as f64 / *whole_count as f64);
            prop_assert_eq!(entry.proportion, expected);
        }
    }
}
