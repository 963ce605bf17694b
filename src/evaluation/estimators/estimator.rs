/// Online scalar estimator (e.g., streaming mean).
///
/// Implementations accept values incrementally via [`add`] and expose the
/// current estimate via [`estimation`]. NaN inputs are legal and must not
/// poison the estimate; how they affect the denominator is
/// implementation-defined (see [`WindowEstimator`](super::WindowEstimator)).
pub trait Estimator {
    /// Incorporates a new observation.
    fn add(&mut self, v: f64);

    /// Returns the current estimate.
    fn estimation(&self) -> f64;

    /// Returns the sum of in-scope non-NaN observations.
    fn sum(&self) -> f64;
}

pub type BoxedEstimator = Box<dyn Estimator + Send>;
