use crate::core::instance_header::InstanceHeader;
use crate::core::instances::instance::Instance;
use crate::core::instances::DenseInstance;
use crate::streams::Stream;
use std::collections::VecDeque;
use std::io::Error;
use std::sync::Arc;

/// Turns an ordinary labeled stream into a delayed-label stream.
///
/// Each source instance is emitted twice: immediately as an unlabeled
/// arrival (class value masked to NaN), and again with its label once
/// `delay` further arrivals have gone by. Both copies share an instance id,
/// and every emission gets the next value of a monotone arrival counter as
/// its timestamp, so downstream consumers can match the two arrivals and
/// order the predictions made in between.
///
/// Once the source runs dry the remaining labeled copies drain out in
/// arrival order.
pub struct DelayedLabelStream<S: Stream> {
    source: S,
    header: Arc<InstanceHeader>,
    delay: u64,
    next_id: u64,
    arrivals: u64,
    pending_labels: VecDeque<DueLabel>,
}

struct DueLabel {
    due_at: u64,
    id: u64,
    values: Vec<f64>,
    weight: f64,
}

impl<S: Stream> DelayedLabelStream<S> {
    pub fn new(source: S, delay: u64) -> Self {
        let h = source.header();
        let header = Arc::new(InstanceHeader::new(
            h.relation_name().to_string(),
            h.attributes.clone(),
            h.class_index(),
        ));
        Self {
            source,
            header,
            delay,
            next_id: 0,
            arrivals: 0,
            pending_labels: VecDeque::new(),
        }
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Unlabeled arrivals still waiting for their labeled re-emission.
    pub fn outstanding_labels(&self) -> usize {
        self.pending_labels.len()
    }

    fn label_is_due(&self) -> bool {
        self.pending_labels
            .front()
            .is_some_and(|due| due.due_at <= self.arrivals)
    }

    fn emit_due_label(&mut self) -> Option<Box<dyn Instance>> {
        let due = self.pending_labels.pop_front()?;
        let timestamp = self.arrivals as f64;
        self.arrivals += 1;
        Some(Box::new(DenseInstance::with_identity(
            Arc::clone(&self.header),
            due.values,
            due.weight,
            due.id,
            timestamp,
        )))
    }
}

impl<S: Stream> Stream for DelayedLabelStream<S> {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.source.has_more_instances() || !self.pending_labels.is_empty()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if self.label_is_due() {
            return self.emit_due_label();
        }

        match self.source.next_instance() {
            Some(inner) => {
                let id = self.next_id;
                self.next_id += 1;
                let timestamp = self.arrivals as f64;
                self.arrivals += 1;

                let values = inner.to_vec();
                let weight = inner.weight();
                self.pending_labels.push_back(DueLabel {
                    due_at: self.arrivals + self.delay,
                    id,
                    values: values.clone(),
                    weight,
                });

                let mut masked = values;
                if let Some(class) = masked.get_mut(self.header.class_index()) {
                    *class = f64::NAN;
                }
                Some(Box::new(DenseInstance::with_identity(
                    Arc::clone(&self.header),
                    masked,
                    weight,
                    id,
                    timestamp,
                )))
            }
            // Source exhausted: drain whatever labels are still queued.
            None => self.emit_due_label(),
        }
    }

    fn estimated_remaining_instances(&self) -> Option<u64> {
        self.source
            .estimated_remaining_instances()
            .map(|n| 2 * n + self.pending_labels.len() as u64)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.source.restart()?;
        self.next_id = 0;
        self.arrivals = 0;
        self.pending_labels.clear();
        Ok(())
    }
}
