use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Online classifier contract consumed by the evaluation tasks.
///
/// `get_votes_for_instance` returns one score per class; an empty vector
/// means the model abstains and evaluators skip the update.
pub trait Classifier {
    fn set_model_context(&mut self, header: Arc<InstanceHeader>);

    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64>;

    fn train_on_instance(&mut self, instance: &dyn Instance);
}
