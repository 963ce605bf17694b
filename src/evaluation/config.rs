use crate::evaluation::error::EvaluationError;
use crate::evaluation::estimators::EstimatorKind;
use serde::{Deserialize, Serialize};

/// Immutable per-evaluator configuration, captured at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Cumulative or sliding-window accumulation (window width 1000 by default).
    pub estimator: EstimatorKind,
    /// Output aggregate precision, recall and F1 scores.
    pub precision_recall_output: bool,
    /// Report precision per class.
    pub precision_per_class: bool,
    /// Report recall per class.
    pub recall_per_class: bool,
    /// Report F1 per class.
    pub f1_per_class: bool,
    /// Report the overhead of extended evaluation (prediction and buffer counts).
    pub report_extended_overhead: bool,
    /// Maintain the label-transition ledger and emit differential matrices.
    /// Costs O(numClasses^3) memory, so the bin layer enables it only on the
    /// final test-then-train evaluator.
    pub calculate_differential_matrices: bool,
}

impl EvaluatorConfig {
    /// Rejects values serde accepts structurally but no evaluator can run
    /// with, so deserialized configs fail before any estimator is built.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.estimator == (EstimatorKind::Window { width: 0 }) {
            return Err(EvaluationError::InvalidConfig(
                "window width must be > 0".into(),
            ));
        }
        Ok(())
    }
}
