use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::testing::dummies::header_nominal;
use std::io::Error;
use std::sync::Arc;

/// In-memory stream over `(features, label)` rows, for tests.
pub struct VecStream {
    pub header: Arc<InstanceHeader>,
    pub rows: Vec<(Vec<f64>, usize)>,
    idx: usize,
}

impl VecStream {
    pub fn binary(rows: Vec<(Vec<f64>, usize)>) -> Self {
        Self::nominal(rows, 2)
    }

    pub fn nominal(rows: Vec<(Vec<f64>, usize)>, num_classes: usize) -> Self {
        Self {
            header: header_nominal(num_classes),
            rows,
            idx: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }

        let (features, y) = &self.rows[self.idx];
        self.idx += 1;
        let mut values = features.clone();
        values.push(*y as f64);
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            values,
            1.0,
        )))
    }

    fn estimated_remaining_instances(&self) -> Option<u64> {
        Some((self.rows.len() - self.idx) as u64)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
