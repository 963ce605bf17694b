/// One resolved instance's label transition: how it was predicted before
/// the true label arrived, how it was predicted after, and the truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelUpdateTuple {
    pub weight: f64,
    pub earlier_predicted_class: usize,
    pub predicted_class: usize,
    pub true_class: usize,
}

impl LabelUpdateTuple {
    pub fn new(
        weight: f64,
        earlier_predicted_class: usize,
        predicted_class: usize,
        true_class: usize,
    ) -> Self {
        Self {
            weight,
            earlier_predicted_class,
            predicted_class,
            true_class,
        }
    }
}

/// 3-D weight tally over (earlier predicted, final predicted, true) class
/// triples, backing the differential confusion matrices.
pub trait LabelUpdateLog {
    fn add(&mut self, tuple: LabelUpdateTuple);

    fn total_weight(
        &self,
        earlier_predicted_class: usize,
        predicted_class: usize,
        true_class: usize,
    ) -> f64;
}

pub type BoxedLabelUpdateLog = Box<dyn LabelUpdateLog + Send>;

/// Flat `num_classes^3` registry shared by both ledger variants.
#[derive(Debug, Clone)]
pub(super) struct WeightRegistry {
    cells: Vec<f64>,
    num_classes: usize,
}

impl WeightRegistry {
    pub(super) fn new(num_classes: usize) -> Self {
        Self {
            cells: vec![0.0; num_classes * num_classes * num_classes],
            num_classes,
        }
    }

    #[inline]
    fn index(&self, earlier: usize, predicted: usize, true_class: usize) -> usize {
        (earlier * self.num_classes + predicted) * self.num_classes + true_class
    }

    #[inline]
    pub(super) fn get(&self, earlier: usize, predicted: usize, true_class: usize) -> f64 {
        self.cells[self.index(earlier, predicted, true_class)]
    }

    #[inline]
    pub(super) fn accumulate(&mut self, tuple: &LabelUpdateTuple, weight: f64) {
        let i = self.index(
            tuple.earlier_predicted_class,
            tuple.predicted_class,
            tuple.true_class,
        );
        self.cells[i] += weight;
    }
}
