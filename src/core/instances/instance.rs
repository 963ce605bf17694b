use crate::core::instance_header::InstanceHeader;
use std::io::Error;

/// One example from a stream.
///
/// In the delayed-label setting an instance also carries an identity and an
/// arrival timestamp: the unlabeled arrival and the later labeled arrival of
/// the same example share the same identity, and timestamps order the
/// predictions made while the label is pending.
pub trait Instance {
    fn weight(&self) -> f64;

    fn set_weight(&mut self, new_value: f64) -> Result<(), Error>;

    fn value_at_index(&self, index: usize) -> Option<f64>;

    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error>;

    fn class_index(&self) -> usize;

    fn class_value(&self) -> Option<f64>;

    fn set_class_value(&mut self, new_value: f64) -> Result<(), Error>;

    /// A missing class value is encoded as NaN.
    fn is_class_missing(&self) -> bool;

    fn number_of_classes(&self) -> usize;

    /// Stable identity linking the unlabeled and labeled arrivals.
    fn instance_id(&self) -> u64;

    /// Arrival timestamp (stream position or wall time, stream-defined).
    fn timestamp(&self) -> f64;

    fn to_vec(&self) -> Vec<f64>;

    fn header(&self) -> &InstanceHeader;
}
