//! Fixed-notional backtest simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;
use trend_core::error::StrategyError;
use trend_core::types::{PriceBar, Signal};

use crate::statistics::{round2, OpenPosition, StrategyTradeStat, TradeRecord};

/// Default simulated capital per trade.
pub const DEFAULT_NOTIONAL: f64 = 100_000.0;

/// An open leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub units: u64,
}

/// Simulator position state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(Leg),
    Short(Leg),
}

/// Replays a position sequence against bar opens.
///
/// A position change on bar `i` acts on bar `i + 1` at its open:
/// - `Long` from flat or short opens a long of `floor(notional / |open|)`
///   units, skipped when that is 0.
/// - `Short` from long closes and records the trade, then opens a short at
///   the same open unless it is the final bar.
/// - `Neutral` closes a long (recorded) or drops a short.
///
/// Shorts are never recorded as trades; they only show up as the open
/// position when still held at the end.
#[derive(Debug, Clone)]
pub struct BacktestSimulator {
    notional: f64,
}

impl BacktestSimulator {
    pub fn new(notional: f64) -> Self {
        Self { notional }
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Whole units the notional buys at `price`.
    pub fn units_for(&self, price: f64) -> u64 {
        let price = price.abs();
        if price == 0.0 || !price.is_finite() {
            return 0;
        }
        (self.notional / price).floor().max(0.0) as u64
    }

    fn open_leg(&self, index: usize, bar: &PriceBar) -> Option<Leg> {
        let units = self.units_for(bar.open);
        (units > 0).then(|| Leg {
            entry_index: index,
            entry_date: bar.time_key,
            entry_price: bar.open,
            units,
        })
    }

    fn close_long(leg: &Leg, index: usize, bar: &PriceBar) -> TradeRecord {
        let profit = (bar.open - leg.entry_price) * leg.units as f64;
        let percent = if leg.entry_price != 0.0 {
            (bar.open - leg.entry_price) / leg.entry_price.abs() * 100.0
        } else {
            0.0
        };

        TradeRecord {
            entry_date: leg.entry_date,
            exit_date: bar.time_key,
            buy: leg.entry_price,
            sell: bar.open,
            units: leg.units,
            holding_days: index - leg.entry_index + 1,
            profit: round2(profit),
            percent: round2(percent),
        }
    }

    /// Apply a position change at bar `index`.
    fn transition(
        &self,
        state: PositionState,
        target: Signal,
        index: usize,
        bar: &PriceBar,
        is_last: bool,
        records: &mut Vec<TradeRecord>,
    ) -> PositionState {
        match (state, target) {
            (PositionState::Flat | PositionState::Short(_), Signal::Long) => self
                .open_leg(index, bar)
                .map(PositionState::Long)
                .unwrap_or_default(),
            (PositionState::Long(leg), Signal::Short) => {
                records.push(Self::close_long(&leg, index, bar));
                if is_last {
                    PositionState::Flat
                } else {
                    self.open_leg(index, bar)
                        .map(PositionState::Short)
                        .unwrap_or_default()
                }
            }
            (PositionState::Flat, Signal::Short) if !is_last => self
                .open_leg(index, bar)
                .map(PositionState::Short)
                .unwrap_or_default(),
            (PositionState::Long(leg), Signal::Neutral) => {
                records.push(Self::close_long(&leg, index, bar));
                PositionState::Flat
            }
            (PositionState::Short(_), Signal::Neutral) => PositionState::Flat,
            (state, _) => state,
        }
    }

    /// Simulate `positions` over `bars`.
    pub fn run(
        &self,
        key: &str,
        bars: &[PriceBar],
        positions: Vec<Signal>,
    ) -> Result<StrategyTradeStat, StrategyError> {
        if positions.len() != bars.len() {
            return Err(StrategyError::LengthMismatch {
                key: key.to_string(),
                expected: bars.len(),
                actual: positions.len(),
            });
        }
        let Some(last_bar) = bars.last() else {
            return Ok(StrategyTradeStat::empty(key, self.notional));
        };
        let last = bars.len() - 1;

        let mut state = PositionState::Flat;
        let mut status = Signal::Neutral;
        let mut days = 0usize;
        let mut first_entry = None;
        let mut records = Vec::new();

        for (i, bar) in bars.iter().enumerate() {
            if days == 1 {
                state = self.transition(state, status, i, bar, i == last, &mut records);
                if let (PositionState::Long(leg), None) = (&state, first_entry) {
                    first_entry = Some(leg.entry_price);
                }
            }

            if positions[i] != status {
                status = positions[i];
                days = 1;
            } else {
                days += 1;
            }
        }

        let open_position = match &state {
            PositionState::Flat => None,
            PositionState::Long(leg) => Some(OpenPosition {
                side: Signal::Long,
                entry_date: leg.entry_date,
                entry_price: leg.entry_price,
                units: leg.units,
                days_held: last - leg.entry_index + 1,
                floating_pnl: round2((last_bar.close - leg.entry_price) * leg.units as f64),
            }),
            PositionState::Short(leg) => Some(OpenPosition {
                side: Signal::Short,
                entry_date: leg.entry_date,
                entry_price: leg.entry_price,
                units: leg.units,
                days_held: last - leg.entry_index + 1,
                floating_pnl: round2((leg.entry_price - last_bar.close) * leg.units as f64),
            }),
        };

        trace!(key = %key, trades = records.len(), "Simulation finished");

        Ok(StrategyTradeStat::finalize(
            key,
            self.notional,
            records,
            positions,
            first_entry,
            last_bar.close,
            open_position,
        ))
    }
}

impl Default for BacktestSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIONAL)
    }
}
