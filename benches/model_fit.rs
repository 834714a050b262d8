//! Benchmarks for the decomposable model fit and the per-group search.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plant_forecast::core::DailySeries;
use plant_forecast::models::{fit_and_forecast, TrialParameters};
use plant_forecast::tuning::search_best_params;

fn generate_sales(n: usize) -> DailySeries {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates = (0..n).map(|i| base + Duration::days(i as i64)).collect();
    let values = (0..n)
        .map(|i| {
            let weekly = 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin();
            let monthly = 4.0 * (2.0 * std::f64::consts::PI * i as f64 / 30.5).cos();
            60.0 + 0.05 * i as f64 + weekly + monthly
        })
        .collect();
    DailySeries::new(dates, values).unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposable_fit");
    let params = TrialParameters::default();

    for size in [90, 365, 730].iter() {
        let series = generate_sales(*size);
        group.bench_with_input(BenchmarkId::new("fit_and_forecast", size), size, |b, _| {
            b.iter(|| fit_and_forecast(black_box(&series), &params, 30, 0.8))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_search");
    group.sample_size(10);

    let series = generate_sales(365);
    group.bench_function("30_trials_365_days", |b| {
        b.iter(|| search_best_params(black_box(&series), 30, 42, 0.8))
    });
    group.finish();
}

criterion_group!(benches, bench_fit, bench_search);
criterion_main!(benches);
