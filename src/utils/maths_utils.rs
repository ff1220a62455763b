use argminmax::ArgMinMax;

/// `None` for an empty slice (argminmax panics on empty input).
pub fn get_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    let (min_index, max_index) = vec.argminmax();
    Some((vec[min_index], vec[max_index]))
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.iter().sum::<f64>() / vec.len() as f64)
}

/// Pads a (min, max) range by `pct` of its height on both sides.
/// A flat range gets a 1% pad around its value so the plot still has height.
pub fn pad_range(min: f64, max: f64, pct: f64) -> (f64, f64) {
    let height = max - min;
    if height <= f64::EPSILON {
        let pad = (min.abs() * 0.01).max(f64::EPSILON);
        return (min - pad, max + pad);
    }
    (min - height * pct, max + height * pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn min_max_of_closes() {
        let closes = [4.5, 2.0, 9.25, 3.0];
        assert_eq!(get_min_max(&closes), Some((2.0, 9.25)));
        assert_eq!(get_min_max(&[]), None);
    }

    #[test]
    fn mean_of_window() {
        assert!(approx_eq(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn padding_keeps_flat_ranges_visible() {
        let (lo, hi) = pad_range(10.0, 20.0, 0.05);
        assert!(approx_eq(lo, 9.5));
        assert!(approx_eq(hi, 20.5));

        let (lo, hi) = pad_range(100.0, 100.0, 0.05);
        assert!(lo < 100.0 && hi > 100.0);
    }
}
