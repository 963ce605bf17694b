use crate::evaluation::bins::BinSet;
use crate::evaluation::measurement::Measurement;
use crate::evaluation::summary::summary_evaluator::{SummaryEvaluator, aligned_columns};

/// Weighted average over the waiting-period bins with exponentially decaying
/// weight: earlier bins (predictions available sooner after arrival) count
/// more. The final test-then-train bin is excluded, since it measures the
/// model after the label is already known.
///
/// Bin `b` of `n` receives weight proportional to `lambda^(b / n)`; weights
/// are normalized to sum to one, so `lambda == 1` reduces to a plain average.
#[derive(Debug)]
pub struct ExponentialDecaySummary {
    lambda: f64,
    weights: Vec<f64>,
}

impl ExponentialDecaySummary {
    pub fn new(bin_count: usize, lambda: f64) -> Self {
        let n = bin_count.max(1) as f64;
        let mut weights: Vec<f64> = (0..=bin_count)
            .map(|b| lambda.powf(b as f64 / n))
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { lambda, weights }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl SummaryEvaluator for ExponentialDecaySummary {
    fn tag(&self) -> String {
        format!("summary {}:", self.lambda)
    }

    fn reduce(&self, bins: &BinSet) -> Vec<Measurement> {
        let tag = self.tag();
        aligned_columns(bins, false)
            .into_iter()
            .map(|(name, column)| {
                let value = column
                    .iter()
                    .zip(&self.weights)
                    .filter_map(|(v, w)| v.map(|v| v * w))
                    .sum::<f64>();
                Measurement::new(format!("{tag}{name}"), value)
            })
            .collect()
    }
}
