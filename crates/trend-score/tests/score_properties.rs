//! Property tests for the trend score.
//!
//! 1. Boundedness: every score lies in [0, 100]
//! 2. Monotonicity: z-scored batches preserve the raw score order
//! 3. The `min_data_points` boundary between min-max and CDF scaling

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use trend_core::types::{IndicatorGroup, PriceBar, Signal};
use trend_indicators::IndicatorResult;
use trend_score::normalize::normalize;
use trend_score::{ScoreConfig, TrendScoreAggregator};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_raw(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-3.0..3.0_f64, len)
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Short), Just(Signal::Neutral), Just(Signal::Long)]
}

fn bars(closes: &[f64], volumes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    closes
        .iter()
        .zip(volumes.iter())
        .enumerate()
        .map(|(i, (&c, &v))| {
            PriceBar::new(start + Duration::days(i as i64), c, c * 1.01, c * 0.99, c, v)
        })
        .collect()
}

fn indicator(key: &str, group: IndicatorGroup, signals: Vec<Signal>) -> IndicatorResult {
    IndicatorResult {
        key: key.to_string(),
        group,
        weight: 1.0,
        status: signals.last().copied().unwrap_or_default(),
        days: 1,
        signals,
        value: 0.0,
    }
}

// ── 1. Boundedness ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalized_scores_bounded(raw in arb_raw(1..90)) {
        let n = normalize(&raw, 30);
        prop_assert_eq!(n.scores.len(), raw.len());
        for s in &n.scores {
            prop_assert!((0.0..=100.0).contains(s));
        }
    }

    #[test]
    fn aggregated_scores_bounded(
        series in prop::collection::vec((1.0..200.0_f64, 0.0..1e6_f64, arb_signal(), arb_signal()), 1..70),
    ) {
        let closes: Vec<f64> = series.iter().map(|s| s.0).collect();
        let volumes: Vec<f64> = series.iter().map(|s| s.1).collect();
        let base: Vec<Signal> = series.iter().map(|s| s.2).collect();
        let power: Vec<Signal> = series.iter().map(|s| s.3).collect();
        let b = bars(&closes, &volumes);

        let indicators = vec![
            indicator("SMA5_indicator", IndicatorGroup::Base, base),
            indicator("RSI14_indicator", IndicatorGroup::Power, power),
        ];
        let batch = TrendScoreAggregator::new(ScoreConfig::default())
            .score(1, &b, &indicators, &[])
            .unwrap();

        prop_assert_eq!(batch.len(), b.len());
        for r in batch.iter() {
            prop_assert!((0.0..=100.0).contains(&r.score));
            prop_assert!((-1.0..=1.0).contains(&r.trend_persistence));
        }
    }
}

// ── 2. Monotonicity ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn z_scores_preserve_order(raw in arb_raw(31..120)) {
        let n = normalize(&raw, 30);
        prop_assert!(n.z_scores.is_some());
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                if raw[i] > raw[j] {
                    prop_assert!(n.scores[i] >= n.scores[j] - 1e-9);
                }
            }
        }
    }

    #[test]
    fn min_max_preserves_order(raw in arb_raw(2..31)) {
        let n = normalize(&raw, 30);
        prop_assert!(n.z_scores.is_none());
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                if raw[i] > raw[j] {
                    prop_assert!(n.scores[i] >= n.scores[j]);
                }
            }
        }
    }
}

// ── 3. min_data_points boundary ──────────────────────────────────────

proptest! {
    #[test]
    fn boundary_switches_scaling(min_points in 2usize..60) {
        let at: Vec<f64> = (0..min_points).map(|i| (i as f64 * 0.37).sin()).collect();
        let above: Vec<f64> = (0..=min_points).map(|i| (i as f64 * 0.37).sin()).collect();

        let n_at = normalize(&at, min_points);
        prop_assert!(n_at.z_scores.is_none());
        let hi = n_at.scores.iter().copied().fold(f64::MIN, f64::max);
        prop_assert!((hi - 100.0).abs() < 1e-9);

        let n_above = normalize(&above, min_points);
        prop_assert!(n_above.z_scores.is_some());
        prop_assert!(n_above.scores.iter().all(|s| *s < 100.0));
    }
}
