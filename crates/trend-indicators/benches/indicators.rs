//! Benchmarks for indicator implementations.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trend_core::traits::Indicator;
use trend_core::PriceBar;
use trend_indicators::{
    ema, wma, IndicatorAggregator, Macd, MovingAverageCross, NnTransformedRsi, VolumeSuperTrendAi,
};

fn generate_test_bars(size: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let volume = 1_000_000.0 + (i as f64 * 0.37).cos() * 250_000.0;
            PriceBar::new(
                start + Duration::days(i as i64),
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                volume,
            )
        })
        .collect()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("MovingAverage");

    for size in [1000, 10000].iter() {
        let data: Vec<f64> = generate_test_bars(*size).iter().map(|b| b.close).collect();

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            b.iter(|| ema(black_box(data), black_box(20)))
        });

        group.bench_with_input(BenchmarkId::new("wma", size), &data, |b, data| {
            b.iter(|| wma(black_box(data), black_box(20)))
        });
    }

    group.finish();
}

fn benchmark_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Indicator");
    let bars = generate_test_bars(2500);

    let indicators: Vec<(&str, Box<dyn Indicator>)> = vec![
        ("sma200", Box::new(MovingAverageCross::sma(200))),
        ("macd", Box::new(Macd::default())),
        ("nntrsi", Box::new(NnTransformedRsi::default())),
        ("supertrend_ai", Box::new(VolumeSuperTrendAi::default())),
    ];

    for (name, indicator) in &indicators {
        group.bench_function(*name, |b| b.iter(|| indicator.calculate(black_box(&bars))));
    }

    group.finish();
}

fn benchmark_aggregator(c: &mut Criterion) {
    let mut group = c.benchmark_group("Aggregator");
    let aggregator = IndicatorAggregator::with_defaults();

    for size in [250, 1000].iter() {
        let bars = generate_test_bars(*size);
        group.bench_with_input(BenchmarkId::new("defaults", size), &bars, |b, bars| {
            b.iter(|| aggregator.evaluate(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_indicators,
    benchmark_aggregator
);
criterion_main!(benches);
