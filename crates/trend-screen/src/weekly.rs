//! Weekly resampling.

use chrono::Datelike;
use trend_core::types::PriceBar;

/// Last close of each ISO week, in time order.
///
/// Bars must be ascending by time key. The current, possibly partial, week
/// is included.
pub fn weekly_closes(bars: &[PriceBar]) -> Vec<f64> {
    let mut closes: Vec<f64> = Vec::new();
    let mut current = None;

    for bar in bars {
        let week = bar.time_key.iso_week();
        if current == Some(week) {
            if let Some(last) = closes.last_mut() {
                *last = bar.close;
            }
        } else {
            current = Some(week);
            closes.push(bar.close);
        }
    }

    closes
}
