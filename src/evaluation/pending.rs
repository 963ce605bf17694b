use crate::core::instances::Instance;

/// Why a prediction was made for an in-flight instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    /// Made when the unlabeled instance arrived.
    First,
    /// Periodic refresh while the label was still pending.
    Reprediction,
    /// Made when the true label arrived (test-then-train).
    Final,
}

/// One timestamped class-vote vector recorded for a pending instance.
#[derive(Debug, Clone)]
pub struct PredictionItem {
    pub votes: Vec<f64>,
    pub timestamp: f64,
    pub kind: PredictionKind,
}

impl PredictionItem {
    pub fn new(votes: Vec<f64>, timestamp: f64, kind: PredictionKind) -> Self {
        Self {
            votes,
            timestamp,
            kind,
        }
    }
}

/// An instance buffered while its true label is outstanding, together with
/// every prediction made for it so far.
pub struct PendingInstance {
    pub instance: Box<dyn Instance>,
    pub predictions: Vec<PredictionItem>,
    /// Labeled arrivals observed since this entry was created; drives the
    /// re-prediction cadence.
    pub instances_passed: u64,
}

impl PendingInstance {
    pub fn new(instance: Box<dyn Instance>, first_prediction: PredictionItem) -> Self {
        Self {
            instance,
            predictions: vec![first_prediction],
            instances_passed: 0,
        }
    }
}

/// Ordered collection of instances awaiting their labels, scanned
/// front-to-back on every labeled arrival.
#[derive(Default)]
pub struct PendingBuffer {
    entries: Vec<PendingInstance>,
}

impl PendingBuffer {
    pub fn add(&mut self, entry: PendingInstance) {
        self.entries.push(entry);
    }

    pub fn get(&self, index: usize) -> Option<&PendingInstance> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PendingInstance> {
        self.entries.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> PendingInstance {
        self.entries.remove(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total outstanding prediction count across the buffer.
    pub fn prediction_count(&self) -> usize {
        self.entries.iter().map(|e| e.predictions.len()).sum()
    }
}
