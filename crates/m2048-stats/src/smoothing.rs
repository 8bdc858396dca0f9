/// Computes the simple moving average of `values` over a sliding window.
///
/// The result uses valid-convolution semantics: no padding is applied, so the
/// output has `values.len() - window + 1` elements and element `i` is the
/// arithmetic mean of `values[i..i + window]`.
///
/// Returns an empty vector when `window` is zero or longer than the input.
///
/// # Examples
///
/// ```
/// # use m2048_stats::smoothing::moving_average;
/// assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), vec![2.0, 3.0, 4.0]);
/// assert!(moving_average(&[1.0, 2.0], 3).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return vec![];
    }
    let divisor = window as f64;
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / divisor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_matches_valid_convolution() {
        let values = (0..20).map(f64::from).collect::<Vec<_>>();
        for window in 1..=25 {
            let smoothed = moving_average(&values, window);
            assert_eq!(smoothed.len(), (values.len() + 1).saturating_sub(window));
        }
    }

    #[test]
    fn test_each_value_is_window_mean() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let smoothed = moving_average(&values, 4);
        for (i, avg) in smoothed.iter().enumerate() {
            let expected = values[i..i + 4].iter().sum::<f64>() / 4.0;
            assert!((avg - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [1.5, -2.0, 7.25];
        assert_eq!(moving_average(&values, 1), values.to_vec());
    }

    #[test]
    fn test_zero_window_is_empty() {
        assert!(moving_average(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_window_equal_to_length() {
        assert_eq!(moving_average(&[2.0, 4.0, 6.0], 3), vec![4.0]);
    }
}
