use crate::evaluation::estimators::Estimator;

/// Unbounded streaming mean: `mean = sum / len`.
///
/// NaN values are dropped entirely: they are neither summed nor counted.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicEstimator {
    len: f64,
    sum: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.len += 1.0;
        self.sum += v;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.len > 0.0 {
            self.sum / self.len
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn sum(&self) -> f64 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_estimation_is_nan() {
        let e = BasicEstimator::default();
        assert!(e.estimation().is_nan());
        assert_eq!(e.sum(), 0.0);
    }

    #[test]
    fn estimation_is_mean_of_non_nan_values() {
        let mut e = BasicEstimator::default();
        for v in [1.0, f64::NAN, 2.0, f64::NAN, 6.0] {
            e.add(v);
        }
        assert!((e.estimation() - 3.0).abs() < 1e-12);
        assert_eq!(e.sum(), 9.0);
    }

    #[test]
    fn all_nan_input_keeps_estimate_nan() {
        let mut e = BasicEstimator::default();
        e.add(f64::NAN);
        e.add(f64::NAN);
        assert!(e.estimation().is_nan());
    }
}
