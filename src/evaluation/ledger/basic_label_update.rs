use crate::evaluation::ledger::label_update::{LabelUpdateLog, LabelUpdateTuple, WeightRegistry};

/// Unbounded label-transition tally: cells only grow.
#[derive(Debug, Clone)]
pub struct BasicLabelUpdateLog {
    registry: WeightRegistry,
}

impl BasicLabelUpdateLog {
    pub fn new(num_classes: usize) -> Self {
        Self {
            registry: WeightRegistry::new(num_classes),
        }
    }
}

impl LabelUpdateLog for BasicLabelUpdateLog {
    fn add(&mut self, tuple: LabelUpdateTuple) {
        // NaN-weighted tuples are ignored entirely, not tallied.
        if tuple.weight.is_nan() {
            return;
        }
        self.registry.accumulate(&tuple, tuple.weight);
    }

    fn total_weight(
        &self,
        earlier_predicted_class: usize,
        predicted_class: usize,
        true_class: usize,
    ) -> f64 {
        self.registry
            .get(earlier_predicted_class, predicted_class, true_class)
    }
}
