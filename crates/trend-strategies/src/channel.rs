//! Shared helpers: the double-line stop channel and run checks.

use trend_core::types::Signal;

/// Positions from a trailing stop channel.
///
/// The stop line sits `adjust` below `base` while price is above it and
/// `adjust` above `base` while price is below, ratcheting in the direction
/// of the trend. Price crossing the previous stop flips the position; it
/// holds otherwise.
pub fn double_line_pos(price: &[f64], base: &[f64], adjust: &[f64]) -> Vec<Signal> {
    let len = price.len().min(base.len()).min(adjust.len());
    if len == 0 {
        return Vec::new();
    }

    let mut stop = Vec::with_capacity(len);
    stop.push(base[0] - adjust[0]);
    for i in 1..len {
        let p = price[i];
        let last_p = price[i - 1];
        let last_stop = stop[i - 1];
        let lo = base[i] - adjust[i];
        let hi = base[i] + adjust[i];

        let next = if p > last_stop && last_p > last_stop {
            lo.max(last_stop)
        } else if p < last_stop && last_p < last_stop {
            hi.min(last_stop)
        } else if p > last_stop {
            lo
        } else {
            hi
        };
        stop.push(next);
    }

    let mut positions = Vec::with_capacity(len);
    positions.push(Signal::Neutral);
    for i in 1..len {
        let p = price[i];
        let last_p = price[i - 1];
        let last_stop = stop[i - 1];

        let next = if last_p < last_stop && p > last_stop {
            Signal::Long
        } else if last_p > last_stop && p < last_stop {
            Signal::Short
        } else {
            positions[i - 1]
        };
        positions.push(next);
    }

    positions
}

/// True when every value in `data[day - length .. day]` is at least `threshold`.
///
/// The window excludes `day` itself and is clipped at the series start.
pub fn keeps_above(data: &[f64], threshold: f64, day: usize, length: usize) -> bool {
    let start = day.saturating_sub(length);
    data[start..day.min(data.len())].iter().all(|v| *v >= threshold)
}

/// True when every value in `data[day - length .. day]` is at most `threshold`.
pub fn keeps_below(data: &[f64], threshold: f64, day: usize, length: usize) -> bool {
    let start = day.saturating_sub(length);
    data[start..day.min(data.len())].iter().all(|v| *v <= threshold)
}
