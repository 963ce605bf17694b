mod basic_estimator;
mod estimator;
mod window_estimator;

use serde::{Deserialize, Serialize};

pub use basic_estimator::BasicEstimator;
pub use estimator::{BoxedEstimator, Estimator};
pub use window_estimator::WindowEstimator;

/// Selects the accumulation behavior of every estimator (and transition
/// ledger) owned by an evaluator. This is the single injection point for
/// cumulative vs. sliding-window evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorKind {
    Cumulative,
    Window { width: usize },
}

impl EstimatorKind {
    pub fn new_estimator(&self) -> BoxedEstimator {
        match *self {
            EstimatorKind::Cumulative => Box::new(BasicEstimator::default()),
            EstimatorKind::Window { width } => Box::new(WindowEstimator::new(width)),
        }
    }
}

impl Default for EstimatorKind {
    fn default() -> Self {
        EstimatorKind::Window { width: 1000 }
    }
}
