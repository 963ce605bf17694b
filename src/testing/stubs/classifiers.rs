use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Votes one-hot for the true class when the label is present, abstains
/// (empty votes) otherwise.
#[derive(Default)]
pub struct OracleClassifier {
    num_classes: usize,
}

impl Classifier for OracleClassifier {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.num_classes = header.number_of_classes();
    }

    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        if instance.is_class_missing() {
            return Vec::new();
        }
        let k = if self.num_classes > 0 {
            self.num_classes
        } else {
            instance.number_of_classes()
        };
        let y = instance.class_value().unwrap_or(0.0) as usize;
        let mut votes = vec![0.0; k];
        if let Some(v) = votes.get_mut(y) {
            *v = 1.0;
        }
        votes
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}
}

/// Predicts `feature[0] mod num_classes`. Works on unlabeled instances, so
/// it scores perfectly on streams whose label follows the same rule.
#[derive(Default)]
pub struct ParityClassifier {
    num_classes: usize,
}

impl Classifier for ParityClassifier {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.num_classes = header.number_of_classes();
    }

    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let k = if self.num_classes > 0 {
            self.num_classes
        } else {
            instance.number_of_classes()
        };
        if k == 0 {
            return Vec::new();
        }
        let x = instance.value_at_index(0).unwrap_or(0.0) as usize;
        let mut votes = vec![0.0; k];
        votes[x % k] = 1.0;
        votes
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}
}

/// Uniformly random one-hot votes.
#[derive(Default)]
pub struct RandomClassifier {
    num_classes: usize,
}

impl Classifier for RandomClassifier {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.num_classes = header.number_of_classes();
    }

    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        use rand::Rng;
        let k = if self.num_classes > 0 {
            self.num_classes
        } else {
            instance.number_of_classes()
        };
        if k == 0 {
            return Vec::new();
        }
        let mut votes = vec![0.0; k];
        votes[rand::rng().random_range(0..k)] = 1.0;
        votes
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}
}

/// Counts `train_on_instance` calls; the handle outlives the boxed learner.
pub struct TrainSpyClassifier {
    trained: Arc<AtomicUsize>,
}

pub struct TrainSpyHandle {
    trained: Arc<AtomicUsize>,
}

impl TrainSpyHandle {
    pub fn count(&self) -> usize {
        self.trained.load(Ordering::SeqCst)
    }
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let trained = Arc::new(AtomicUsize::new(0));
        (
            Self {
                trained: Arc::clone(&trained),
            },
            TrainSpyHandle { trained },
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn set_model_context(&mut self, _header: Arc<InstanceHeader>) {}

    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        vec![1.0; instance.number_of_classes().max(1)]
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {
        self.trained.fetch_add(1, Ordering::SeqCst);
    }
}
