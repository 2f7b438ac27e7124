/// Smoothing and proportion estimation benchmarks
///
/// One year of daily counts is the typical chart input; the larger sizes
/// cover multi-year "All times" ranges.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use epifill::config::EstimationConfig;
use epifill::date::UnifiedDay;
use epifill::estimate::{estimate_proportions, DailyCounts};
use epifill::smoothing::centered_moving_average;
use epifill::wilson::{wilson_interval, Z_95};
use std::time::Duration;

fn daily_series(days: usize) -> Vec<DailyCounts> {
    let mut series = Vec::with_capacity(days);
    let mut date = UnifiedDay::parse("2020-01-06").ok();
    for index in 0..days {
        let Some(current) = date else { break };
        // weekly sequencing rhythm with empty weekends
        let sequenced = if index % 7 >= 5 { 0.0 } else { 40.0 + (index % 13) as f64 };
        series.push(DailyCounts {
            date: current,
            sequenced,
            variant_count: sequenced * (index as f64 / days as f64),
        });
        date = current.next();
    }
    series
}

fn bench_moving_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("centered_moving_average");
    group.measurement_time(Duration::from_secs(5));

    for size in [365usize, 1095, 3650].iter() {
        let values: Vec<f64> = (0..*size).map(|i| (i % 31) as f64).collect();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| centered_moving_average(black_box(values), 7));
        });
    }

    group.finish();
}

fn bench_estimate_proportions(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_proportions");
    group.measurement_time(Duration::from_secs(5));

    let config = EstimationConfig::default();
    let today = UnifiedDay::parse("2030-01-01").ok();

    for size in [365usize, 1095].iter() {
        let series = daily_series(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| {
                if let Some(today) = today {
                    let _ = estimate_proportions(black_box(series), today, &config);
                }
            });
        });
    }

    group.finish();
}

fn bench_wilson(c: &mut Criterion) {
    let mut group = c.benchmark_group("wilson_interval");
    group.throughput(Throughput::Elements(1));

    group.bench_function("fractional_counts", |b| {
        b.iter(|| wilson_interval(black_box(12.4), black_box(57.1), Z_95));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_moving_average,
    bench_estimate_proportions,
    bench_wilson
);
criterion_main!(benches);
