use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use crate::evaluation::error::EvaluationError;
use std::collections::HashMap;

/// Online evaluator of predictive performance.
///
/// A `PerformanceEvaluator` consumes ground-truth examples and their
/// associated prediction scores (class votes) and exposes aggregated
/// metrics via [`performance`].
pub trait PerformanceEvaluator {
    /// Clears internal state/metrics (schema does not change).
    fn reset(&mut self) -> Result<(), EvaluationError>;

    /// Feeds one example and its class votes (one score per class).
    ///
    /// Examples with a missing class only advance the prediction counters;
    /// unusable votes are skipped.
    fn add_result(
        &mut self,
        example: &dyn Instance,
        class_votes: &[f64],
    ) -> Result<(), EvaluationError>;

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Returns (name, Some(value)|None) for each requested metric, preserving
    /// order. Names are matched with the evaluator tag stripped.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ms = self.performance();
        let map: HashMap<String, f64> = ms
            .into_iter()
            .map(|m| (m.untagged_name().to_string(), m.value))
            .collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
