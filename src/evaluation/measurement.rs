/// Summarized scalar metric produced by a performance evaluator.
///
/// Names are prefixed with the owning evaluator's tag (e.g. `"bin 3:"`);
/// summary reducers match measurements by the part after the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    /// Convenience constructor
    #[inline]
    pub fn new<N: Into<String>>(name: N, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The metric name with any leading `"tag:"` prefix removed.
    #[inline]
    pub fn untagged_name(&self) -> &str {
        match self.name.find(':') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }
}
