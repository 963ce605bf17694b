use crate::evaluation::ledger::label_update::{LabelUpdateLog, LabelUpdateTuple, WeightRegistry};

/// Sliding-window label-transition tally over the last `width` tuples.
///
/// Overwriting an occupied slot first subtracts the evicted tuple's weight
/// from its cell, so the registry always reflects exactly the tuples still
/// in the window. Eviction happens even when the incoming tuple carries a
/// NaN weight; only the add side is skipped for NaN.
#[derive(Debug, Clone)]
pub struct WindowLabelUpdateLog {
    window: Vec<Option<LabelUpdateTuple>>,
    pos: usize,
    registry: WeightRegistry,
}

impl WindowLabelUpdateLog {
    pub fn new(width: usize, num_classes: usize) -> Self {
        assert!(width > 0, "window width must be positive");
        Self {
            window: vec![None; width],
            pos: 0,
            registry: WeightRegistry::new(num_classes),
        }
    }
}

impl LabelUpdateLog for WindowLabelUpdateLog {
    fn add(&mut self, tuple: LabelUpdateTuple) {
        if let Some(forget) = self.window[self.pos].take() {
            if !forget.weight.is_nan() {
                self.registry.accumulate(&forget, -forget.weight);
            }
        }

        self.window[self.pos] = Some(tuple);
        if !tuple.weight.is_nan() {
            self.registry.accumulate(&tuple, tuple.weight);
        }

        self.pos += 1;
        if self.pos == self.window.len() {
            self.pos = 0;
        }
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
