use crate::evaluation::estimators::Estimator;

/// Sliding-window mean over the last `width` additions, O(1) per update.
///
/// NaN values occupy a window slot but are excluded from the mean. This
/// keeps per-class precision/recall windows time-aligned across classes:
/// a class that did not appear in a given update still consumes a slot.
#[derive(Debug, Clone)]
pub struct WindowEstimator {
    window: Vec<f64>,
    pos: usize,
    len: usize,
    sum: f64,
    nan_count: f64,
}

impl WindowEstimator {
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "window width must be positive");
        Self {
            window: vec![f64::NAN; width],
            pos: 0,
            len: 0,
            sum: 0.0,
            nan_count: 0.0,
        }
    }
}

impl Estimator for WindowEstimator {
    fn add(&mut self, v: f64) {
        // Eviction only once the window has filled; until then the slot
        // being written never held an observation.
        if self.len == self.window.len() {
            let forget = self.window[self.pos];
            if !forget.is_nan() {
                self.sum -= forget;
            } else {
                self.nan_count -= 1.0;
            }
        }
        if !v.is_nan() {
            self.sum += v;
        } else {
            self.nan_count += 1.0;
        }
        self.window[self.pos] = v;
        self.pos += 1;
        if self.pos == self.window.len() {
            self.pos = 0;
        }
        if self.len < self.window.len() {
            self.len += 1;
        }
    }

    fn estimation(&self) -> f64 {
        let denom = self.len as f64 - self.nan_count;
        if denom == 0.0 {
            f64::NAN
        } else {
            self.sum / denom
        }
    }

    fn sum(&self) -> f64 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_window_is_plain_mean() {
        let mut e = WindowEstimator::new(10);
        for v in [1.0, 2.0, 3.0] {
            e.add(v);
        }
        assert!((e.estimation() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn estimation_covers_last_width_values_only() {
        let mut e = WindowEstimator::new(3);
        for v in [100.0, 200.0, 1.0, 2.0, 3.0] {
            e.add(v);
        }
        assert!((e.estimation() - 2.0).abs() < 1e-12);
        assert!((e.sum() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn nan_occupies_a_slot_but_is_excluded_from_the_mean() {
        let mut e = WindowEstimator::new(3);
        e.add(4.0);
        e.add(f64::NAN);
        e.add(8.0);
        // two real values over three occupied slots
        assert!((e.estimation() - 6.0).abs() < 1e-12);

        // pushing one more evicts the oldest real value
        e.add(f64::NAN);
        assert!((e.estimation() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn all_nan_window_estimates_nan() {
        let mut e = WindowEstimator::new(2);
        e.add(f64::NAN);
        e.add(f64::NAN);
        e.add(f64::NAN);
        assert!(e.estimation().is_nan());
    }

    #[test]
    fn eviction_of_nan_restores_denominator() {
        let mut e = WindowEstimator::new(2);
        e.add(f64::NAN);
        e.add(1.0);
        e.add(3.0); // evicts the NaN
        assert!((e.estimation() - 2.0).abs() < 1e-12);
    }
}
