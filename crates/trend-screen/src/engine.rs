//! Candidate screening.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use trend_core::types::{BarSeriesExt, PriceBar, Ticker, TickerType};
use trend_indicators::{ema, sma, wma};

use crate::config::{FilterConfig, NineTurnRule, ValuationBounds};
use crate::weekly::weekly_closes;

/// Why a ticker failed the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    NotStock(TickerType),
    ExcludedPrefix(String),
    /// No bars or no score history
    NoData,
    TooShort { bars: usize, min: usize },
    MissingValuation(String),
    PeOutOfRange(f64),
    PbTooHigh(f64),
    MarketCapTooHigh(f64),
    Illiquid { avg_turnover: f64, down_streak: usize },
    WeakScore { short: f64, mid: f64, long: f64, last: f64 },
    BelowChannel { lookback: usize },
    WeeklyDeviation(f64),
    NoNineTurn { up: usize, down: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotStock(ty) => write!(f, "not a stock ({:?})", ty),
            RejectReason::ExcludedPrefix(prefix) => write!(f, "excluded prefix {}", prefix),
            RejectReason::NoData => write!(f, "no bars or score history"),
            RejectReason::TooShort { bars, min } => {
                write!(f, "{} bars, at least {} required", bars, min)
            }
            RejectReason::MissingValuation(field) => write!(f, "missing {}", field),
            RejectReason::PeOutOfRange(pe) => write!(f, "P/E {:.2} out of range", pe),
            RejectReason::PbTooHigh(pb) => write!(f, "P/B {:.2} too high", pb),
            RejectReason::MarketCapTooHigh(cap) => write!(f, "market cap {:.0} too high", cap),
            RejectReason::Illiquid {
                avg_turnover,
                down_streak,
            } => write!(
                f,
                "average turnover {:.0} with {} down closes",
                avg_turnover, down_streak
            ),
            RejectReason::WeakScore { short, mid, long, last } => write!(
                f,
                "weak score trend ({:.1}/{:.1}/{:.1}, last {:.1})",
                short, mid, long, last
            ),
            RejectReason::BelowChannel { lookback } => {
                write!(f, "close not above close {} bars back", lookback)
            }
            RejectReason::WeeklyDeviation(dev) => {
                write!(f, "{:.1}% away from weekly EMA", dev * 100.0)
            }
            RejectReason::NoNineTurn { up, down } => {
                write!(f, "no nine-turn setup (up {}, down {})", up, down)
            }
        }
    }
}

/// Outcome of screening one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreenDecision {
    Pass,
    Reject(RejectReason),
}

impl ScreenDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, ScreenDecision::Pass)
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ScreenDecision::Pass => None,
            ScreenDecision::Reject(reason) => Some(reason),
        }
    }
}

/// Applies the screening rules to one ticker at a time.
///
/// Every check must pass; the first failing check is reported.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Screen a ticker given its bars and final score history, both in
    /// time order.
    pub fn evaluate(&self, ticker: &Ticker, bars: &[PriceBar], scores: &[f64]) -> ScreenDecision {
        let decision = match self.check(ticker, bars, scores) {
            Ok(()) => ScreenDecision::Pass,
            Err(reason) => ScreenDecision::Reject(reason),
        };
        trace!(code = %ticker.code, decision = ?decision, "Screened");
        decision
    }

    pub fn passes(&self, ticker: &Ticker, bars: &[PriceBar], scores: &[f64]) -> bool {
        self.evaluate(ticker, bars, scores).is_pass()
    }

    fn check(&self, ticker: &Ticker, bars: &[PriceBar], scores: &[f64]) -> Result<(), RejectReason> {
        if ticker.ticker_type != TickerType::Stock {
            return Err(RejectReason::NotStock(ticker.ticker_type));
        }
        if let Some(prefix) = self
            .config
            .excluded_prefixes
            .iter()
            .find(|p| ticker.code.starts_with(p.as_str()))
        {
            return Err(RejectReason::ExcludedPrefix(prefix.clone()));
        }

        let (last_bar, last_score) = match (bars.last(), scores.last()) {
            (Some(bar), Some(&score)) => (bar, score),
            _ => return Err(RejectReason::NoData),
        };
        let close = last_bar.close;
        if let Some(rule) = &self.config.nine_turn {
            if bars.len() < rule.min_bars {
                return Err(RejectReason::TooShort {
                    bars: bars.len(),
                    min: rule.min_bars,
                });
            }
        }

        if let Some(bounds) = &self.config.valuation {
            check_valuation(bounds, ticker, close)?;
        }

        self.check_liquidity(bars)?;
        self.check_score_trend(scores, last_score)?;
        match &self.config.nine_turn {
            Some(rule) => check_nine_turn(rule, bars),
            None => {
                self.check_channel(bars, close)?;
                self.check_weekly(bars, close)
            }
        }
    }

    fn check_liquidity(&self, bars: &[PriceBar]) -> Result<(), RejectReason> {
        let avg_turnover = sma(&bars.turnovers(), self.config.turnover_window)
            .last()
            .copied()
            .unwrap_or(0.0);
        let down_streak = bars
            .windows(2)
            .rev()
            .take_while(|w| w[1].close < w[0].close)
            .count();

        if avg_turnover < self.config.min_turnover && down_streak < self.config.capitulation_bars {
            return Err(RejectReason::Illiquid {
                avg_turnover,
                down_streak,
            });
        }
        Ok(())
    }

    fn check_score_trend(&self, scores: &[f64], last: f64) -> Result<(), RejectReason> {
        let last_wma = |period| wma(scores, period).last().copied().unwrap_or(0.0);
        let short = last_wma(self.config.score_short);
        let mid = last_wma(self.config.score_mid);
        let long = last_wma(self.config.score_long);

        let aligned = short >= mid && mid > long && last > self.config.last_score_threshold;
        if aligned || short > self.config.score_threshold {
            Ok(())
        } else {
            Err(RejectReason::WeakScore {
                short,
                mid,
                long,
                last,
            })
        }
    }

    fn check_channel(&self, bars: &[PriceBar], close: f64) -> Result<(), RejectReason> {
        let len = bars.len();
        for &lookback in &self.config.channel_lookbacks {
            let reference = bars[len - lookback.clamp(1, len)].close;
            if close <= reference {
                return Err(RejectReason::BelowChannel { lookback });
            }
        }
        Ok(())
    }

    fn check_weekly(&self, bars: &[PriceBar], close: f64) -> Result<(), RejectReason> {
        let weekly = weekly_closes(bars);
        let weekly_ema = ema(&weekly, self.config.weekly_ema_period)
            .last()
            .copied()
            .unwrap_or(0.0);
        if weekly_ema <= 0.0 {
            return Err(RejectReason::WeeklyDeviation(f64::INFINITY));
        }

        let deviation = (close - weekly_ema).abs() / weekly_ema;
        if deviation < self.config.weekly_max_deviation {
            Ok(())
        } else {
            Err(RejectReason::WeeklyDeviation(deviation))
        }
    }
}

/// Trailing (up, down) runs of closes above / below the close `lookback`
/// bars earlier.
pub fn nine_turn_counts(closes: &[f64], lookback: usize) -> (usize, usize) {
    let run = |beats: fn(f64, f64) -> bool| {
        (lookback..closes.len())
            .rev()
            .take_while(|&i| beats(closes[i], closes[i - lookback]))
            .count()
    };
    (run(|c, prev| c > prev), run(|c, prev| c < prev))
}

fn check_nine_turn(rule: &NineTurnRule, bars: &[PriceBar]) -> Result<(), RejectReason> {
    let (up, down) = nine_turn_counts(&bars.closes(), rule.lookback);
    if (rule.up_min..rule.up_max).contains(&up) || down == rule.down_exact {
        Ok(())
    } else {
        Err(RejectReason::NoNineTurn { up, down })
    }
}

fn check_valuation(bounds: &ValuationBounds, ticker: &Ticker, close: f64) -> Result<(), RejectReason> {
    let pe = ticker
        .pe_ttm
        .ok_or_else(|| RejectReason::MissingValuation("pe_ttm".into()))?;
    if !(pe > bounds.pe_min && pe < bounds.pe_max) {
        return Err(RejectReason::PeOutOfRange(pe));
    }

    let pb = ticker
        .pb
        .ok_or_else(|| RejectReason::MissingValuation("pb".into()))?;
    if pb > bounds.pb_max {
        return Err(RejectReason::PbTooHigh(pb));
    }

    let cap = ticker
        .market_cap(close)
        .ok_or_else(|| RejectReason::MissingValuation("total_share".into()))?;
    if cap > bounds.market_cap_max {
        return Err(RejectReason::MarketCapTooHigh(cap));
    }
    Ok(())
}
