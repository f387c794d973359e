//! Time decay of signal histories.

use trend_core::types::Signal;

/// Reweight the trailing `window` signals of a history.
///
/// With `d = factor^(bars from the end)`, signals in the older half of the
/// window are scaled by `d` and those in the newer half by `2 - d`. Nothing
/// changes unless the history is longer than the window.
pub fn apply_time_decay(signals: &[Signal], factor: f64, window: usize) -> Vec<f64> {
    let len = signals.len();
    let mut decayed: Vec<f64> = signals.iter().map(|s| s.as_f64()).collect();
    if len <= window {
        return decayed;
    }

    let newer_half = len - window / 2;
    for i in len - window..len {
        if decayed[i] == 0.0 {
            continue;
        }
        let weight = factor.powi((len - 1 - i) as i32);
        decayed[i] *= if i < newer_half { weight } else { 2.0 - weight };
    }
    decayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use Signal::*;

    #[test]
    fn test_short_history_untouched() {
        let decayed = apply_time_decay(&[Long, Short, Neutral], 0.95, 10);
        assert_eq!(decayed, vec![1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_decay_window() {
        let signals = vec![Long; 12];
        let decayed = apply_time_decay(&signals, 0.5, 4);

        // outside the window
        assert!((decayed[7] - 1.0).abs() < 1e-10);
        // older half: 0.5^3 and 0.5^2
        assert!((decayed[8] - 0.125).abs() < 1e-10);
        assert!((decayed[9] - 0.25).abs() < 1e-10);
        // newer half: 2 - 0.5 and 2 - 1
        assert!((decayed[10] - 1.5).abs() < 1e-10);
        assert!((decayed[11] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_sign_preserved() {
        let mut signals = vec![Neutral; 20];
        signals[12] = Short;
        signals[19] = Short;
        let decayed = apply_time_decay(&signals, 0.95, 10);

        assert!((decayed[12] - -(0.95f64.powi(7))).abs() < 1e-10);
        assert!((decayed[19] - -1.0).abs() < 1e-10);
        assert!(decayed[13..19].iter().all(|d| *d == 0.0));
    }
}
