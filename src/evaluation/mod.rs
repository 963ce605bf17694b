pub mod bins;
pub mod config;
pub mod error;
pub mod estimators;
pub mod evaluators;
pub mod ledger;
mod measurement;
pub mod pending;
pub mod preview;
pub mod summary;

pub use bins::BinSet;
pub use config::EvaluatorConfig;
pub use error::EvaluationError;
pub use estimators::{BasicEstimator, Estimator, EstimatorKind, WindowEstimator};
pub use evaluators::{ClassificationEvaluator, PerformanceEvaluator, PerformanceEvaluatorExt};
pub use measurement::Measurement;
pub use preview::{CurveFormat, LearningCurve, Snapshot};
pub use summary::{ExponentialDecaySummary, MaximumSummary, SummaryEvaluator};
