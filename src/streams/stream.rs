use crate::core::instance_header::InstanceHeader;
use crate::core::instances::instance::Instance;
use std::io::Error;

/// Pull-based source of `Instance`s.
///
/// Sources may be finite (datasets, replay logs) or unbounded generators.
/// Every instance a stream yields must conform to the single immutable
/// [`InstanceHeader`] returned by [`header`](Stream::header) for the whole
/// lifetime of the stream. In the delayed-label setting a stream may yield
/// the same logical example twice (unlabeled, then labeled); both arrivals
/// share an instance id and carry increasing timestamps.
pub trait Stream {
    /// The schema (relation name, attributes, class index) of every
    /// instance this stream produces.
    fn header(&self) -> &InstanceHeader;

    /// Whether the stream *may* produce more instances. Cheap and side
    /// effect free; once this returns `false`,
    /// [`next_instance`](Stream::next_instance) must return `None`.
    fn has_more_instances(&self) -> bool;

    /// The next instance, or `None` at end of stream. End of stream is a
    /// normal condition, never a panic.
    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;

    /// A hint of how many instances remain, when the source knows.
    /// Generators and other unbounded sources return `None`.
    fn estimated_remaining_instances(&self) -> Option<u64> {
        None
    }

    /// Rewinds to the initial state: seek for file-backed sources, re-seed
    /// and clear counters for generators. The header never changes. Fails
    /// if the underlying source cannot be reopened or sought.
    fn restart(&mut self) -> Result<(), Error>;
}
