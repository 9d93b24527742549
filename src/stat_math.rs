/// Samples below this size are averaged as-is instead of trimmed.
pub const MIN_TRIM_SAMPLE: usize = 3;

/// Ratio with a zero (or non-finite) result mapped to 0.
///
/// Every percentage and ratio in a profile goes through here so NaN/inf never
/// reaches trend arithmetic.
pub fn safe_div(numer: f64, denom: f64) -> f64 {
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    let out = numer / denom;
    if out.is_finite() { out } else { 0.0 }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    safe_div(values.iter().sum::<f64>(), values.len() as f64)
}

/// Mean after dropping one lowest and one highest observation.
///
/// With fewer than three values nothing is dropped. Only the first and last
/// elements after sorting are removed, so repeated extremes survive.
pub fn trimmed_mean(values: &[f64]) -> f64 {
    if values.len() < MIN_TRIM_SAMPLE {
        return mean(values);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    mean(&sorted[1..sorted.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn safe_div_zero_denominator() {
        assert_eq!(safe_div(5.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(3.0, 4.0), 0.75);
    }

    #[test]
    fn trimmed_drops_one_of_each_extreme() {
        let pts = [10.0, 50.0, 20.0, 25.0, 30.0, 15.0, 22.0];
        assert!((trimmed_mean(&pts) - 22.4).abs() < 1e-9);

        // Only one of the two 10s goes.
        assert!((trimmed_mean(&[10.0, 10.0, 20.0, 30.0]) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn trimmed_small_and_empty() {
        assert_eq!(trimmed_mean(&[]), 0.0);
        assert_eq!(trimmed_mean(&[4.0]), 4.0);
        assert_eq!(trimmed_mean(&[4.0, 8.0]), 6.0);
        assert_eq!(trimmed_mean(&[1.0, 2.0, 9.0]), 2.0);
    }

    proptest! {
        #[test]
        fn trimmed_within_bounds(values in prop::collection::vec(0.0f64..200.0, 3..20)) {
            let t = trimmed_mean(&values);
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(t >= lo - 1e-9 && t <= hi + 1e-9);
            if lo < hi {
                let mut sorted = values.clone();
                sorted.sort_by(f64::total_cmp);
                let inner_lo = sorted[1];
                let inner_hi = sorted[sorted.len() - 2];
                prop_assert!(t >= inner_lo - 1e-9 && t <= inner_hi + 1e-9);
            }
        }

        #[test]
        fn short_samples_are_plain_mean(values in prop::collection::vec(-50.0f64..50.0, 1..3)) {
            let expected = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((trimmed_mean(&values) - expected).abs() < 1e-9);
        }
    }
}
