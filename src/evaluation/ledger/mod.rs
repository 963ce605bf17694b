mod basic_label_update;
mod label_update;
mod window_label_update;

pub use basic_label_update::BasicLabelUpdateLog;
pub use label_update::{BoxedLabelUpdateLog, LabelUpdateLog, LabelUpdateTuple};
pub use window_label_update::WindowLabelUpdateLog;

use crate::evaluation::estimators::EstimatorKind;

impl EstimatorKind {
    /// Ledger variant mirroring the estimator variant: cumulative estimators
    /// pair with the unbounded ledger, windowed with the sliding one.
    pub fn new_label_update_log(&self, num_classes: usize) -> BoxedLabelUpdateLog {
        match *self {
            EstimatorKind::Cumulative => Box::new(BasicLabelUpdateLog::new(num_classes)),
            EstimatorKind::Window { width } => {
                Box::new(WindowLabelUpdateLog::new(width, num_classes))
            }
        }
    }
}
