/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear-interpolated percentile at fractional rank `p * (n - 1)`.
///
/// `p` is a fraction in `[0, 1]` and is clamped into that range. Returns 0.0 for empty input.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Rounds to a fixed number of decimals for presentation.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_single_and_order() {
        assert_eq!(mean(&[4.5]), 4.5);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), mean(&[6.0, 1.0, 2.0]));
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_percentile_empty_is_zero() {
        assert_eq!(percentile(&[], 0.9), 0.0);
    }

    #[test]
    fn test_percentile_bounds() {
        let values = [1.0, 3.0, 7.0, 9.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 9.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        // rank = 0.5 * 3 = 1.5 -> halfway between 3 and 7
        assert_eq!(percentile(&[1.0, 3.0, 7.0, 9.0], 0.5), 5.0);
        // rank = 0.9 * 4 = 3.6 -> 85 + 0.6 * (90 - 85)
        let v = percentile(&[70.0, 75.0, 80.0, 85.0, 90.0], 0.9);
        assert!((v - 88.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let a = percentile(&[78.0, 82.0, 76.0, 85.0, 80.0], 0.92);
        let b = percentile(&[76.0, 78.0, 80.0, 82.0, 85.0], 0.92);
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(65.7333, 1), 65.7);
        assert_eq!(round_to(0.16499, 3), 0.165);
        assert_eq!(round_to(33.333, 1), 33.3);
    }
}
