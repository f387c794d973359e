//! Raw score normalization to [0, 100].

use statrs::function::erf::erfc;

/// Smallest standard deviation used when z-scoring.
pub const MIN_STD: f64 = 1e-12;

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Normalized scores and, when z-scoring was used, the z-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub scores: Vec<f64>,
    pub z_scores: Option<Vec<f64>>,
}

/// Map raw scores to [0, 100].
///
/// More than `min_data_points` values: population z-score mapped through
/// the normal CDF. Otherwise min-max scaling, with a flat batch using a
/// range of 1 so every score reads 0.
pub fn normalize(raw: &[f64], min_data_points: usize) -> Normalized {
    if raw.is_empty() {
        return Normalized {
            scores: Vec::new(),
            z_scores: None,
        };
    }

    if raw.len() > min_data_points {
        let n = raw.len() as f64;
        let mean = raw.iter().sum::<f64>() / n;
        let variance = raw.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt().max(MIN_STD);

        let z: Vec<f64> = raw.iter().map(|r| (r - mean) / std).collect();
        let scores = z.iter().map(|z| (normal_cdf(*z) * 100.0).clamp(0.0, 100.0)).collect();
        return Normalized {
            scores,
            z_scores: Some(z),
        };
    }

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    let scores = raw
        .iter()
        .map(|r| ((r - min) / range * 100.0).clamp(0.0, 100.0))
        .collect();

    Normalized {
        scores,
        z_scores: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_cdf(-1.0) + normal_cdf(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_branch() {
        let n = normalize(&[1.0, 3.0, 2.0], 30);
        assert!(n.z_scores.is_none());
        assert_eq!(n.scores, vec![0.0, 100.0, 50.0]);
    }

    #[test]
    fn test_flat_batch_min_max() {
        let n = normalize(&[0.4; 5], 30);
        assert!(n.scores.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_boundary_at_min_data_points() {
        let raw: Vec<f64> = (0..30).map(|i| i as f64).collect();
        // exactly min_data_points: min-max
        let n = normalize(&raw, 30);
        assert!(n.z_scores.is_none());
        assert_eq!(n.scores[0], 0.0);
        assert_eq!(n.scores[29], 100.0);

        // one more: CDF, which never reaches the extremes here
        let raw: Vec<f64> = (0..31).map(|i| i as f64).collect();
        let n = normalize(&raw, 30);
        assert!(n.z_scores.is_some());
        assert!(n.scores[0] > 0.0);
        assert!(n.scores[30] < 100.0);
        assert!((n.scores[15] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_batch_z() {
        let n = normalize(&vec![0.25; 40], 30);
        let z = n.z_scores.unwrap();
        assert!(z.iter().all(|z| *z == 0.0));
        assert!(n.scores.iter().all(|s| (s - 50.0).abs() < 1e-10));
    }

    #[test]
    fn test_empty() {
        let n = normalize(&[], 30);
        assert!(n.scores.is_empty());
    }
}
