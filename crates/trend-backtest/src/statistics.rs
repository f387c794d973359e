//! Backtest statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trend_core::types::{trailing_run, Signal};

/// Round a money or percentage figure to two decimals.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `num / den * 100`, or 0 when `den` is 0.
fn percent(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den * 100.0
    }
}

/// Record of a single completed long trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    /// Entry open price
    pub buy: f64,
    /// Exit open price
    pub sell: f64,
    pub units: u64,
    /// Bars from entry to exit, both inclusive
    pub holding_days: usize,
    pub profit: f64,
    /// Price change relative to the entry price
    pub percent: f64,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.profit >= 0.0
    }
}

/// Leg still open on the final bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// `Long` or `Short`
    pub side: Signal,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub units: u64,
    pub days_held: usize,
    /// Unrealised P&L at the final close
    pub floating_pnl: f64,
}

/// Aggregate result of simulating one strategy over one bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyTradeStat {
    pub key: String,
    pub notional: f64,
    pub net_profit: f64,
    pub net_profit_pct: f64,
    pub gross_profit: f64,
    pub gross_profit_pct: f64,
    pub gross_loss: f64,
    pub gross_loss_pct: f64,
    /// Buy-and-hold baseline from the first long entry to the final close
    pub hold_return: f64,
    pub hold_return_pct: f64,
    pub trades: usize,
    pub win_trades: usize,
    pub loss_trades: usize,
    pub avg_holding_days: f64,
    pub avg_win_holding_days: f64,
    pub avg_loss_holding_days: f64,
    /// Share of winning trades
    pub profitable_pct: f64,
    pub avg_win_pct: f64,
    pub avg_loss_pct: f64,
    pub win_loss_ratio: f64,
    pub records: Vec<TradeRecord>,
    /// Raw strategy position per bar
    pub positions: Vec<Signal>,
    /// Last raw position
    pub status: Signal,
    /// Trailing bars spent in `status`
    pub status_days: usize,
    pub open_position: Option<OpenPosition>,
}

impl StrategyTradeStat {
    /// A zeroed stat with no trades and empty arrays.
    pub fn empty(key: impl Into<String>, notional: f64) -> Self {
        Self {
            key: key.into(),
            notional,
            net_profit: 0.0,
            net_profit_pct: 0.0,
            gross_profit: 0.0,
            gross_profit_pct: 0.0,
            gross_loss: 0.0,
            gross_loss_pct: 0.0,
            hold_return: 0.0,
            hold_return_pct: 0.0,
            trades: 0,
            win_trades: 0,
            loss_trades: 0,
            avg_holding_days: 0.0,
            avg_win_holding_days: 0.0,
            avg_loss_holding_days: 0.0,
            profitable_pct: 0.0,
            avg_win_pct: 0.0,
            avg_loss_pct: 0.0,
            win_loss_ratio: 0.0,
            records: Vec::new(),
            positions: Vec::new(),
            status: Signal::Neutral,
            status_days: 0,
            open_position: None,
        }
    }

    /// Derive every aggregate from the completed trades.
    ///
    /// `hold_return` is `(last_close - first_entry) * floor(notional / first_entry)`.
    pub fn finalize(
        key: impl Into<String>,
        notional: f64,
        records: Vec<TradeRecord>,
        positions: Vec<Signal>,
        first_entry: Option<f64>,
        last_close: f64,
        open_position: Option<OpenPosition>,
    ) -> Self {
        let mut stat = Self::empty(key, notional);

        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;
        let mut win_days = 0usize;
        let mut loss_days = 0usize;
        for record in &records {
            if record.is_win() {
                stat.win_trades += 1;
                gross_profit += record.profit;
                win_days += record.holding_days;
            } else {
                stat.loss_trades += 1;
                gross_loss -= record.profit;
                loss_days += record.holding_days;
            }
        }
        stat.trades = stat.win_trades + stat.loss_trades;

        stat.gross_profit = round2(gross_profit);
        stat.gross_loss = round2(gross_loss);
        stat.net_profit = round2(stat.gross_profit - stat.gross_loss);
        stat.net_profit_pct = round2(percent(stat.net_profit, notional));
        stat.gross_profit_pct = round2(percent(stat.gross_profit, notional));
        stat.gross_loss_pct = round2(percent(stat.gross_loss, notional));

        if let Some(entry) = first_entry.filter(|p| *p != 0.0) {
            let units = (notional / entry.abs()).floor();
            stat.hold_return = round2((last_close - entry) * units);
            stat.hold_return_pct = round2(percent(stat.hold_return, notional));
        }

        if stat.trades > 0 {
            stat.avg_holding_days = (win_days + loss_days) as f64 / stat.trades as f64;
            stat.profitable_pct = round2(percent(stat.win_trades as f64, stat.trades as f64));
        }
        if stat.win_trades > 0 {
            stat.avg_win_holding_days = win_days as f64 / stat.win_trades as f64;
            stat.avg_win_pct = round2(stat.gross_profit_pct / stat.win_trades as f64);
        }
        if stat.loss_trades > 0 {
            stat.avg_loss_holding_days = loss_days as f64 / stat.loss_trades as f64;
            stat.avg_loss_pct = round2(stat.gross_loss_pct / stat.loss_trades as f64);
        }
        if stat.avg_loss_pct != 0.0 {
            stat.win_loss_ratio = round2(stat.avg_win_pct / stat.avg_loss_pct);
        }

        stat.status = positions.last().copied().unwrap_or_default();
        stat.status_days = trailing_run(&positions);
        stat.records = records;
        stat.positions = positions;
        stat.open_position = open_position;
        stat
    }

    /// `trades == win_trades + loss_trades == records.len()`.
    pub fn is_consistent(&self) -> bool {
        self.trades == self.win_trades + self.loss_trades && self.trades == self.records.len()
    }

    /// Floating P&L of the open leg, or 0.
    pub fn floating_pnl(&self) -> f64 {
        self.open_position
            .as_ref()
            .map(|p| p.floating_pnl)
            .unwrap_or(0.0)
    }
}
