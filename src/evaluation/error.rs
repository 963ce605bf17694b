use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    /// A reset was requested with zero classes. This is a stream/schema
    /// misconfiguration; the caller decides whether to abort the run.
    #[error("evaluator reset with zero classes")]
    NoClasses,

    #[error("true class {class} out of range for {num_classes} classes")]
    ClassOutOfRange { class: usize, num_classes: usize },

    #[error("true label required but missing")]
    MissingTrueLabel,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
