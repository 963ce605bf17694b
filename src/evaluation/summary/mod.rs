mod exponential_decay;
mod maximum;
mod summary_evaluator;

pub use exponential_decay::ExponentialDecaySummary;
pub use maximum::MaximumSummary;
pub use summary_evaluator::SummaryEvaluator;
