//! Vote-count score model.
//!
//! Every BASE / POWER indicator and every strategy casts one unweighted
//! vote per bar. No time decay and no price factors.

use trend_backtest::StrategyTradeStat;
use trend_core::types::{IndicatorGroup, PriceBar, Signal};
use trend_indicators::IndicatorResult;

use crate::normalize::normalize;
use crate::record::TrendScoreRecord;

/// Batches longer than this are z-scored.
pub const NORMAL_MIN_DATA_POINTS: usize = 5;

/// Weight of the strategy direction in the raw score.
const STRATEGY_FACTOR_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone)]
struct Votes {
    buy: Vec<usize>,
    sell: Vec<usize>,
    members: usize,
}

impl Votes {
    fn new(len: usize) -> Self {
        Self {
            buy: vec![0; len],
            sell: vec![0; len],
            members: 0,
        }
    }

    fn add(&mut self, signals: &[Signal]) {
        self.members += 1;
        for (i, s) in signals.iter().enumerate() {
            match s {
                Signal::Long => self.buy[i] += 1,
                Signal::Short => self.sell[i] += 1,
                Signal::Neutral => {}
            }
        }
    }

    /// (buy − sell) / members, 0 for an empty family.
    fn net(&self, i: usize) -> f64 {
        if self.members == 0 {
            return 0.0;
        }
        (self.buy[i] as f64 - self.sell[i] as f64) / self.members as f64
    }
}

/// +1 when only buy votes, −1 when only sell votes, 0 when mixed or none.
pub fn direction_factor(buy: usize, sell: usize) -> f64 {
    match (buy > 0, sell > 0) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Score `bars` by vote counts. Inputs must already be aligned.
pub(crate) fn vote_score(
    ticker_id: i64,
    bars: &[PriceBar],
    indicators: &[IndicatorResult],
    strategies: &[StrategyTradeStat],
) -> Vec<TrendScoreRecord> {
    let len = bars.len();

    let mut base = Votes::new(len);
    let mut power = Votes::new(len);
    for result in indicators {
        match result.group {
            IndicatorGroup::Base => base.add(&result.signals),
            IndicatorGroup::Power => power.add(&result.signals),
        }
    }
    let mut strat = Votes::new(len);
    for stat in strategies {
        strat.add(&stat.positions);
    }

    let raw: Vec<f64> = (0..len)
        .map(|i| {
            (base.net(i) + power.net(i)) / 2.0
                + direction_factor(strat.buy[i], strat.sell[i]) * STRATEGY_FACTOR_WEIGHT
        })
        .collect();
    let normalized = normalize(&raw, NORMAL_MIN_DATA_POINTS);

    (0..len)
        .map(|i| TrendScoreRecord {
            ticker_id,
            time_key: bars[i].time_key,
            ma_buy: base.buy[i] as f64,
            ma_sell: base.sell[i] as f64,
            in_buy: power.buy[i] as f64,
            in_sell: power.sell[i] as f64,
            strategy_buy: strat.buy[i],
            strategy_sell: strat.sell[i],
            ma_score: base.net(i) * 50.0 + 50.0,
            in_score: power.net(i) * 50.0 + 50.0,
            strategy_score: strat.net(i) * 50.0 + 50.0,
            trend_strength: 0.0,
            trend_persistence: 0.0,
            volume_price_confirm: 0.0,
            raw_score: raw[i],
            z_score: normalized.z_scores.as_ref().map(|z| z[i]),
            score: normalized.scores[i],
        })
        .collect()
}
