mod delayed;
pub mod stream;

pub use delayed::DelayedLabelStream;
pub use stream::Stream;
