//! Composite trend score over indicator and strategy results.

use tracing::debug;
use trend_backtest::StrategyTradeStat;
use trend_core::error::DataError;
use trend_core::types::{IndicatorGroup, PriceBar, Signal};
use trend_indicators::IndicatorResult;

use crate::config::{ScoreConfig, ScoreModel};
use crate::decay::apply_time_decay;
use crate::factors::{strategy_factor, trend_persistence, trend_strength, volume_price_confirmation};
use crate::normal::vote_score;
use crate::normalize::normalize;
use crate::record::{ScoreBatch, TrendScoreRecord};

/// Composite weights.
const INDICATOR_WEIGHT: f64 = 0.4;
const STRENGTH_WEIGHT: f64 = 0.2;
const PERSISTENCE_WEIGHT: f64 = 0.15;
const STRATEGY_WEIGHT: f64 = 0.15;
const VOLUME_PRICE_WEIGHT: f64 = 0.1;

/// Weighted signal strength per bar for one indicator family.
#[derive(Debug, Clone, Default)]
struct FamilyTally {
    buy: Vec<f64>,
    sell: Vec<f64>,
    members: usize,
}

impl FamilyTally {
    fn new(len: usize) -> Self {
        Self {
            buy: vec![0.0; len],
            sell: vec![0.0; len],
            members: 0,
        }
    }

    fn add(&mut self, decayed: &[f64], weight: f64) {
        self.members += 1;
        for (i, d) in decayed.iter().enumerate() {
            let v = d * weight;
            if v > 0.0 {
                self.buy[i] += v;
            } else if v < 0.0 {
                self.sell[i] -= v;
            }
        }
    }

    /// Net strength per member, clamped to [-1, 1]; 0 for an empty family.
    fn net(&self, i: usize) -> f64 {
        if self.members == 0 {
            return 0.0;
        }
        ((self.buy[i] - self.sell[i]) / self.members as f64).clamp(-1.0, 1.0)
    }
}

/// Trend score aggregator.
#[derive(Debug, Clone, Default)]
pub struct TrendScoreAggregator {
    config: ScoreConfig,
}

impl TrendScoreAggregator {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score every bar of one ticker.
    ///
    /// Every indicator signal history and strategy position array must be
    /// aligned with `bars`. An empty history yields an empty batch.
    pub fn score(
        &self,
        ticker_id: i64,
        bars: &[PriceBar],
        indicators: &[IndicatorResult],
        strategies: &[StrategyTradeStat],
    ) -> Result<ScoreBatch, DataError> {
        let len = bars.len();
        if len == 0 {
            return Ok(ScoreBatch::default());
        }
        check_alignment(len, indicators, strategies)?;

        if self.config.model == ScoreModel::Normal {
            let records = vote_score(ticker_id, bars, indicators, strategies);
            debug!(ticker_id = ticker_id, bars = len, "Vote score computed");
            return Ok(ScoreBatch::new(records));
        }

        let mut strategy_buy = vec![0usize; len];
        let mut strategy_sell = vec![0usize; len];
        for stat in strategies {
            for (i, p) in stat.positions.iter().enumerate() {
                match p {
                    Signal::Long => strategy_buy[i] += 1,
                    Signal::Short => strategy_sell[i] += 1,
                    Signal::Neutral => {}
                }
            }
        }

        let mut base = FamilyTally::new(len);
        let mut power = FamilyTally::new(len);
        for result in indicators {
            let decayed = apply_time_decay(
                &result.signals,
                self.config.time_decay_factor,
                self.config.time_decay_window,
            );
            match result.group {
                IndicatorGroup::Base => base.add(&decayed, result.weight),
                IndicatorGroup::Power => power.add(&decayed, result.weight),
            }
        }

        let strength = trend_strength(bars, self.config.trend_window);
        let persistence = trend_persistence(bars);
        let confirm = volume_price_confirmation(bars);

        let raw: Vec<f64> = (0..len)
            .map(|i| {
                let indicator_v = (base.net(i) + power.net(i)) / 2.0;
                INDICATOR_WEIGHT * indicator_v
                    + STRENGTH_WEIGHT * strength[i]
                    + PERSISTENCE_WEIGHT * persistence[i]
                    + STRATEGY_WEIGHT * strategy_factor(strategy_buy[i], strategy_sell[i])
                    + VOLUME_PRICE_WEIGHT * confirm[i]
            })
            .collect();

        let normalized = normalize(&raw, self.config.min_data_points);
        let strategy_total = strategies.len();

        let records = (0..len)
            .map(|i| {
                let strategy_score = if strategy_total > 0 {
                    (strategy_buy[i] as f64 - strategy_sell[i] as f64) / strategy_total as f64
                        * 50.0
                        + 50.0
                } else {
                    50.0
                };

                TrendScoreRecord {
                    ticker_id,
                    time_key: bars[i].time_key,
                    ma_buy: base.buy[i],
                    ma_sell: base.sell[i],
                    in_buy: power.buy[i],
                    in_sell: power.sell[i],
                    strategy_buy: strategy_buy[i],
                    strategy_sell: strategy_sell[i],
                    ma_score: base.net(i) * 50.0 + 50.0,
                    in_score: power.net(i) * 50.0 + 50.0,
                    strategy_score,
                    trend_strength: strength[i],
                    trend_persistence: persistence[i],
                    volume_price_confirm: confirm[i],
                    raw_score: raw[i],
                    z_score: normalized.z_scores.as_ref().map(|z| z[i]),
                    score: normalized.scores[i],
                }
            })
            .collect();

        debug!(
            ticker_id = ticker_id,
            bars = len,
            base = base.members,
            power = power.members,
            strategies = strategy_total,
            zscored = normalized.z_scores.is_some(),
            "Trend score computed"
        );
        Ok(ScoreBatch::new(records))
    }
}

fn check_alignment(
    len: usize,
    indicators: &[IndicatorResult],
    strategies: &[StrategyTradeStat],
) -> Result<(), DataError> {
    let histories = indicators
        .iter()
        .map(|r| (&r.key, r.signals.len()))
        .chain(strategies.iter().map(|s| (&s.key, s.positions.len())));

    for (key, actual) in histories {
        if actual != len {
            return Err(DataError::LengthMismatch {
                key: key.clone(),
                expected: len,
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bars, indicator, strategy};
    use Signal::*;

    #[test]
    fn test_empty_input() {
        let scorer = TrendScoreAggregator::default();
        let batch = scorer.score(1, &[], &[], &[]).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let scorer = TrendScoreAggregator::default();
        let b = bars(&[10.0, 11.0, 12.0]);
        let ind = indicator("SMA5_indicator", IndicatorGroup::Base, 0.9, vec![Long; 2]);

        let err = scorer.score(1, &b, &[ind], &[]).unwrap_err();
        assert_eq!(
            err,
            DataError::LengthMismatch {
                key: "SMA5_indicator".into(),
                expected: 3,
                actual: 2
            }
        );

        let stat = strategy("X_strategy", vec![Long; 4]);
        assert!(scorer.score(1, &b, &[], &[stat]).is_err());
    }

    #[test]
    fn test_no_families_reference_scores() {
        let scorer = TrendScoreAggregator::default();
        let b = bars(&[10.0, 10.0, 10.0]);
        let batch = scorer.score(3, &b, &[], &[]).unwrap();

        for r in batch.iter() {
            assert_eq!(r.ticker_id, 3);
            assert_eq!(r.ma_score, 50.0);
            assert_eq!(r.in_score, 50.0);
            assert_eq!(r.strategy_score, 50.0);
        }
    }

    #[test]
    fn test_family_routing_and_counts() {
        let scorer = TrendScoreAggregator::default();
        let b = bars(&[10.0, 10.5, 11.0, 11.5]);
        let indicators = vec![
            indicator("SMA5_indicator", IndicatorGroup::Base, 0.9, vec![Long; 4]),
            indicator("RSI14_indicator", IndicatorGroup::Power, 1.1, vec![Short; 4]),
        ];
        let strategies = vec![
            strategy("A_strategy", vec![Long, Long, Short, Neutral]),
            strategy("B_strategy", vec![Long, Short, Short, Neutral]),
        ];

        let batch = scorer.score(1, &b, &indicators, &strategies).unwrap();
        let r = &batch.records()[0];

        // history shorter than the decay window: raw weights only
        assert!((r.ma_buy - 0.9).abs() < 1e-10);
        assert_eq!(r.ma_sell, 0.0);
        assert!((r.in_sell - 1.1).abs() < 1e-10);
        assert!((r.ma_score - 95.0).abs() < 1e-10);
        // clamped to -1
        assert!((r.in_score - 0.0).abs() < 1e-10);

        let counts: Vec<(usize, usize)> = batch
            .iter()
            .map(|r| (r.strategy_buy, r.strategy_sell))
            .collect();
        assert_eq!(counts, vec![(2, 0), (1, 1), (0, 2), (0, 0)]);
        assert_eq!(batch.records()[0].strategy_score, 100.0);
        assert_eq!(batch.records()[2].strategy_score, 0.0);
    }

    #[test]
    fn test_raw_score_composition() {
        let scorer = TrendScoreAggregator::default();
        let b = bars(&[10.0, 11.0]);
        let indicators = vec![indicator("SMA5_indicator", IndicatorGroup::Base, 1.0, vec![Long; 2])];
        let strategies = vec![strategy("A_strategy", vec![Long; 2])];

        let batch = scorer.score(1, &b, &indicators, &strategies).unwrap();
        let r = &batch.records()[1];

        // 0.4 * (1 + 0) / 2 + 0.15 * 0.1 + 0.15 / 3 + 0.1 * 0.3 (flat volume)
        let expected = 0.2 + 0.015 + 0.05 + 0.03;
        assert!((r.raw_score - expected).abs() < 1e-10);
        // min-max over two bars
        assert_eq!(r.score, 100.0);
        assert_eq!(batch.records()[0].score, 0.0);
        assert!(r.z_score.is_none());
    }

    #[test]
    fn test_z_branch_above_min_data_points() {
        let scorer = TrendScoreAggregator::default();
        let closes: Vec<f64> = (0..40).map(|i| 20.0 + (i as f64 * 0.7).sin() * 3.0).collect();
        let b = bars(&closes);

        let batch = scorer.score(1, &b, &[], &[]).unwrap();
        assert_eq!(batch.len(), 40);
        assert!(batch.iter().all(|r| r.z_score.is_some()));
        assert!(batch.iter().all(|r| (0.0..=100.0).contains(&r.score)));
    }

    #[test]
    fn test_normal_model_dispatch() {
        let scorer = TrendScoreAggregator::new(ScoreConfig {
            model: ScoreModel::Normal,
            ..Default::default()
        });
        let b = bars(&[10.0, 11.0]);
        let indicators = vec![indicator("SMA5_indicator", IndicatorGroup::Base, 0.9, vec![Long; 2])];
        let strategies = vec![strategy("A_strategy", vec![Long; 2])];

        let batch = scorer.score(1, &b, &indicators, &strategies).unwrap();
        let r = &batch.records()[1];
        // (1 + 0) / 2 + 0.5, no weights or price factors
        assert!((r.raw_score - 1.0).abs() < 1e-10);
        assert_eq!(r.trend_strength, 0.0);
        assert!((r.ma_buy - 1.0).abs() < 1e-10);

        let short = strategy("A_strategy", vec![Long; 3]);
        assert!(scorer.score(1, &b, &[], &[short]).is_err());
    }

    #[test]
    fn test_deterministic() {
        let scorer = TrendScoreAggregator::default();
        let closes: Vec<f64> = (0..50).map(|i| 30.0 + (i as f64 * 0.3).cos() * 2.0).collect();
        let b = bars(&closes);
        let indicators = vec![indicator(
            "MACD(13,34,9)_indicator",
            IndicatorGroup::Power,
            1.2,
            (0..50).map(|i| if i % 7 < 3 { Long } else { Short }).collect(),
        )];

        let first = scorer.score(1, &b, &indicators, &[]).unwrap();
        let second = scorer.score(1, &b, &indicators, &[]).unwrap();
        assert_eq!(first, second);
    }
}
