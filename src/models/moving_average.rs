use crate::utils::maths_utils;

/// Trailing simple moving average.
///
/// `result[i]` is the mean of `values[i + 1 - window ..= i]`, or `None` while
/// fewer than `window` values are available. A zero window yields all `None`.
/// Output length always equals input length.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut means = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return means;
    }

    // Each window is summed on its own so every value is exactly the mean of its slice
    for (offset, slice) in values.windows(window).enumerate() {
        means[offset + window - 1] = maths_utils::mean(slice);
    }
    means
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_rows_are_undefined() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let sma = rolling_mean(&values, 4);

        assert_eq!(sma.len(), values.len());
        assert!(sma[..3].iter().all(Option::is_none));
        assert_eq!(sma[3], Some(2.5)); // (1+2+3+4)/4
        assert_eq!(sma[9], Some(8.5)); // (7+8+9+10)/4
    }

    #[test]
    fn each_value_is_the_trailing_mean() {
        let values = [3.0, 7.5, 1.25, 9.0, 4.0, 4.0, 11.5, 0.5];
        let window = 3;
        let sma = rolling_mean(&values, window);

        for (i, mean) in sma.iter().enumerate() {
            if i + 1 < window {
                assert!(mean.is_none());
            } else {
                let expected: f64 = values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                assert!((mean.unwrap() - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn window_of_one_is_the_input() {
        let values = [2.0, 4.0, 8.0];
        assert_eq!(rolling_mean(&values, 1), vec![Some(2.0), Some(4.0), Some(8.0)]);
    }

    #[test]
    fn short_or_degenerate_input() {
        assert!(rolling_mean(&[1.0, 2.0, 3.0], 5).iter().all(Option::is_none));
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(Option::is_none));
        assert!(rolling_mean(&[], 3).is_empty());
    }
}
