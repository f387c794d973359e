//! Backtest report generation.

use serde::{Deserialize, Serialize};

use crate::StrategyTradeStat;

/// Strategy results for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Ticker code
    pub ticker: String,
    /// Bars simulated
    pub bars: usize,
    /// One entry per strategy
    pub stats: Vec<StrategyTradeStat>,
}

impl BacktestReport {
    pub fn new(ticker: impl Into<String>, bars: usize, stats: Vec<StrategyTradeStat>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
            stats,
        }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  Ticker:              {}\n", self.ticker));
        s.push_str(&format!("  Bars:                {}\n\n", self.bars));

        for stat in &self.stats {
            s.push_str(&format!("{}\n", stat.key));
            s.push_str("───────────────────────────────────────────────────────────\n");
            s.push_str(&format!(
                "  Net Profit:          {:.2} ({:.2}%)\n",
                stat.net_profit, stat.net_profit_pct
            ));
            s.push_str(&format!(
                "  Gross Profit:        {:.2} ({:.2}%)\n",
                stat.gross_profit, stat.gross_profit_pct
            ));
            s.push_str(&format!(
                "  Gross Loss:          {:.2} ({:.2}%)\n",
                stat.gross_loss, stat.gross_loss_pct
            ));
            s.push_str(&format!(
                "  Hold Return:         {:.2} ({:.2}%)\n",
                stat.hold_return, stat.hold_return_pct
            ));
            s.push_str(&format!(
                "  Trades:              {} ({} won / {} lost)\n",
                stat.trades, stat.win_trades, stat.loss_trades
            ));
            s.push_str(&format!(
                "  Profitable:          {:.2}%\n",
                stat.profitable_pct
            ));
            s.push_str(&format!(
                "  Avg Win / Loss:      {:.2}% / {:.2}%\n",
                stat.avg_win_pct, stat.avg_loss_pct
            ));
            s.push_str(&format!(
                "  Win/Loss Ratio:      {:.2}\n",
                stat.win_loss_ratio
            ));
            s.push_str(&format!(
                "  Avg Holding Days:    {:.1}\n",
                stat.avg_holding_days
            ));
            s.push_str(&format!(
                "  Status:              {} for {} bars\n",
                stat.status, stat.status_days
            ));
            if let Some(open) = &stat.open_position {
                s.push_str(&format!(
                    "  Open Position:       {} {} @ {:.2}, floating {:.2}\n",
                    open.side, open.units, open.entry_price, open.floating_pnl
                ));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV (completed trades only).
    pub fn trades_to_csv(&self) -> String {
        let mut csv = String::from("strategy,entry_date,exit_date,buy,sell,units,holding_days,profit,percent\n");
        for stat in &self.stats {
            for t in &stat.records {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{}\n",
                    stat.key,
                    t.entry_date.format("%Y-%m-%d"),
                    t.exit_date.format("%Y-%m-%d"),
                    t.buy,
                    t.sell,
                    t.units,
                    t.holding_days,
                    t.profit,
                    t.percent
                ));
            }
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_bars_from_opens, BacktestSimulator};
    use trend_core::types::Signal::*;

    fn report() -> BacktestReport {
        let bars = test_bars_from_opens(&[10.0, 10.0, 12.0, 12.0, 10.0]);
        let stat = BacktestSimulator::default()
            .run("TEST_strategy", &bars, vec![Neutral, Long, Long, Neutral, Neutral])
            .unwrap();
        BacktestReport::new("SH.600000", bars.len(), vec![stat])
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("SH.600000"));
        assert!(summary.contains("TEST_strategy"));
        assert!(summary.contains("Net Profit:          -16666.00 (-16.67%)"));
        assert!(summary.contains("1 (0 won / 1 lost)"));
    }

    #[test]
    fn test_report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"][0]["trades"], 1);
        assert_eq!(value["stats"][0]["records"][0]["entry_date"], "2020-01-03");
        assert_eq!(value["stats"][0]["positions"][1], 1);
    }

    #[test]
    fn test_trades_csv() {
        let csv = report().trades_to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("TEST_strategy,2020-01-03,2020-01-05,12,10,8333,3,-16666,"));
    }
}
