use crate::evaluation::bins::BinSet;
use crate::evaluation::measurement::Measurement;
use crate::evaluation::summary::summary_evaluator::{SummaryEvaluator, aligned_columns};

/// Best value each metric reached in any bin.
///
/// Answers "had the labels arrived at the ideal moment, how good could this
/// model have looked": the upper envelope over the waiting period, the first
/// prediction and the final test-then-train result.
#[derive(Debug, Default)]
pub struct MaximumSummary;

impl SummaryEvaluator for MaximumSummary {
    fn tag(&self) -> String {
        "maxperf:".to_string()
    }

    fn reduce(&self, bins: &BinSet) -> Vec<Measurement> {
        let tag = self.tag();
        aligned_columns(bins, true)
            .into_iter()
            .map(|(name, column)| {
                let best = column
                    .into_iter()
                    .flatten()
                    .filter(|v| v.is_finite())
                    .fold(f64::NEG_INFINITY, f64::max);
                let value = if best == f64::NEG_INFINITY {
                    f64::NAN
                } else {
                    best
                };
                Measurement::new(format!("{tag}{name}"), value)
            })
            .collect()
    }
}
