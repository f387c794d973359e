//! Per-bar price and volume factors of the composite score.

use trend_core::types::PriceBar;

/// Volume boost applied to the trend strength on a rising-volume bar.
const VOLUME_BOOST: f64 = 1.2;

/// Clamp for the persistence run length.
const MAX_PERSISTENCE: i32 = 10;

/// Rate of change over `window` bars, boosted when volume rose on the bar.
///
/// Bars before the window, and bars whose base close is 0, read 0.
pub fn trend_strength(bars: &[PriceBar], window: usize) -> Vec<f64> {
    (0..bars.len())
        .map(|i| {
            if i < window || window == 0 {
                return 0.0;
            }
            let base = bars[i - window].close;
            if base == 0.0 {
                return 0.0;
            }
            let change = (bars[i].close - base) / base;
            if bars[i].volume > bars[i - 1].volume {
                change * VOLUME_BOOST
            } else {
                change
            }
        })
        .collect()
}

/// Signed run of consecutive up or down closes, clamped to ±10 and scaled
/// to [-1, 1]. An unchanged close resets the run.
pub fn trend_persistence(bars: &[PriceBar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    let mut run: i32 = 0;
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev = bars[i - 1].close;
            run = if bar.close > prev {
                if run >= 0 { run + 1 } else { 1 }
            } else if bar.close < prev {
                if run <= 0 { run - 1 } else { -1 }
            } else {
                0
            };
            run = run.clamp(-MAX_PERSISTENCE, MAX_PERSISTENCE);
        }
        result.push(run as f64 / MAX_PERSISTENCE as f64);
    }
    result
}

/// Price and volume agreement per bar.
///
/// Up on rising volume 1.0, up otherwise 0.3, down on rising volume -1.0,
/// anything else -0.3. The first bar reads 0.
pub fn volume_price_confirmation(bars: &[PriceBar]) -> Vec<f64> {
    (0..bars.len())
        .map(|i| {
            if i == 0 {
                return 0.0;
            }
            let price_up = bars[i].close > bars[i - 1].close;
            let price_down = bars[i].close < bars[i - 1].close;
            let volume_up = bars[i].volume > bars[i - 1].volume;
            match (price_up, price_down, volume_up) {
                (true, _, true) => 1.0,
                (true, _, false) => 0.3,
                (false, true, true) => -1.0,
                _ => -0.3,
            }
        })
        .collect()
}

/// Strategy consensus in [-1, 1].
///
/// Mixed votes give half the net ratio; one-sided votes scale by a third
/// per strategy, capped at 1.
pub fn strategy_factor(buy: usize, sell: usize) -> f64 {
    match (buy, sell) {
        (0, 0) => 0.0,
        (b, 0) => (b as f64 / 3.0).min(1.0),
        (0, s) => (-(s as f64) / 3.0).max(-1.0),
        (b, s) => (b as f64 - s as f64) / (b + s) as f64 * 0.5,
    }
}
