//! Descriptive statistics over plain slices.
//!
//! Callers validate finiteness first; these functions only define the
//! degenerate cases (empty input, a single sample).

/// Arithmetic mean. 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 with fewer than 2 samples.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n as f64 - 1.0)).sqrt()
}

/// Step-to-step percentage change: `(v[i] - v[i-1]) / v[i-1] * 100` for i >= 1.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(sample_std_dev(&[4.0]), 0.0);
        assert!((sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.138_089_935).abs() < 1e-9);
    }

    #[test]
    fn pct_change_skips_first_row() {
        let r = pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 10.0).abs() < 1e-12);
        assert!((r[1] + 10.0).abs() < 1e-12);
        assert!(pct_change(&[100.0]).is_empty());
    }

    #[test]
    fn extremes() {
        assert_eq!(max(&[3.0, 9.0, 1.0]), 9.0);
        assert_eq!(min(&[3.0, 9.0, 1.0]), 1.0);
    }
}
