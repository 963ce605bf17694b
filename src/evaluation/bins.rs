use crate::core::instances::Instance;
use crate::evaluation::config::EvaluatorConfig;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::evaluators::{ClassificationEvaluator, PerformanceEvaluator};
use crate::evaluation::measurement::Measurement;
use crate::evaluation::pending::PredictionItem;

/// Accuracy over the waiting period, broken into `bin_count + 2` evaluators.
///
/// Bin 0 scores the first (arrival-time) prediction, the last bin scores the
/// final test-then-train prediction, and each interior bin `i` covers the
/// `i`-th equal time slice of the instance's waiting interval. An interior
/// bin aggregates the predictions in force during its slice by dwell time,
/// so an instance whose label took long to arrive and whose guess flipped
/// midway contributes proportionally to both guesses.
///
/// Differential matrices are expensive and only meaningful once the label is
/// known, so the ledger is enabled solely on the final bin.
pub struct BinSet {
    bins: Vec<ClassificationEvaluator>,
    bin_count: usize,
}

impl BinSet {
    pub fn new(config: EvaluatorConfig, bin_count: usize) -> Self {
        let bins = (0..bin_count + 2)
            .map(|i| {
                let mut cfg = config;
                cfg.calculate_differential_matrices =
                    config.calculate_differential_matrices && i == bin_count + 1;
                let mut evaluator = ClassificationEvaluator::new(cfg);
                evaluator.set_tag(format!("bin {i}:"));
                evaluator
            })
            .collect();
        Self { bins, bin_count }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ClassificationEvaluator> {
        self.bins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationEvaluator> {
        self.bins.iter()
    }

    pub fn first_prediction_bin(&self) -> &ClassificationEvaluator {
        &self.bins[0]
    }

    /// Bin 0 doubles as the bookkeeping surface for scheduler overhead
    /// (reprediction counts, buffer occupancy).
    pub fn first_prediction_bin_mut(&mut self) -> &mut ClassificationEvaluator {
        &mut self.bins[0]
    }

    pub fn final_bin(&self) -> &ClassificationEvaluator {
        &self.bins[self.bin_count + 1]
    }

    pub fn reset_with(&mut self, num_classes: usize) -> Result<(), EvaluationError> {
        for bin in &mut self.bins {
            bin.reset_with(num_classes)?;
        }
        Ok(())
    }

    /// Scores one resolved instance against every bin.
    ///
    /// `predictions` is the full timeline recorded while the label was
    /// outstanding, first prediction included and final prediction last.
    /// Interior bin `i` receives the carry-in prediction re-stamped at its
    /// slice start, the predictions made inside the slice, and a sentinel
    /// copy of the latest prediction re-stamped at the slice end, so dwell
    /// time inside the slice is accounted exactly.
    pub fn resolve(
        &mut self,
        example: &dyn Instance,
        predictions: &[PredictionItem],
    ) -> Result<(), EvaluationError> {
        let (Some(first), Some(last)) = (predictions.first(), predictions.last()) else {
            return Ok(());
        };

        self.bins[0].add_cloned_result(example, &first.votes)?;

        let n = self.bin_count;
        let t_first = first.timestamp;
        let span = last.timestamp - t_first;
        for i in 1..=n {
            let bin = &mut self.bins[i];
            if span <= 0.0 {
                // Label arrived immediately: every slice saw only the first
                // prediction.
                bin.add_cloned_result(example, &first.votes)?;
                continue;
            }
            let start = t_first + (i - 1) as f64 * span / n as f64;
            let end = t_first + i as f64 * span / n as f64;

            let mut timeline = Vec::new();
            if let Some(carry) = predictions.iter().rev().find(|p| p.timestamp <= start) {
                timeline.push(PredictionItem::new(carry.votes.clone(), start, carry.kind));
            }
            timeline.extend(
                predictions
                    .iter()
                    .filter(|p| p.timestamp > start && p.timestamp < end)
                    .cloned(),
            );
            if let Some(sentinel) = predictions.iter().rev().find(|p| p.timestamp < end) {
                timeline.push(PredictionItem::new(
                    sentinel.votes.clone(),
                    end,
                    sentinel.kind,
                ));
            }
            bin.add_multiple_results(example, &timeline)?;
        }

        self.bins[n + 1].add_differential_result(example, &first.votes, &last.votes)
    }

    /// Concatenated measurements of every bin, in bin order.
    pub fn performance(&self) -> Vec<Measurement> {
        self.bins.iter().flat_map(|b| b.performance()).collect()
    }
}
