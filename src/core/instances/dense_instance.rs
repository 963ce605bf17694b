use crate::core::instance_header::InstanceHeader;
use crate::core::instances::instance::Instance;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

pub struct DenseInstance {
    pub header: Arc<InstanceHeader>,
    pub values: Vec<f64>,
    pub weight: f64,
    pub id: u64,
    pub timestamp: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> DenseInstance {
        DenseInstance {
            header,
            values,
            weight,
            id: 0,
            timestamp: 0.0,
        }
    }

    pub fn with_identity(
        header: Arc<InstanceHeader>,
        values: Vec<f64>,
        weight: f64,
        id: u64,
        timestamp: f64,
    ) -> DenseInstance {
        DenseInstance {
            header,
            values,
            weight,
            id,
            timestamp,
        }
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, new_value: f64) -> Result<(), Error> {
        if new_value < 0.0 {
            Err(Error::new(
                ErrorKind::InvalidInput,
                "Weight cannot be negative",
            ))
        } else {
            self.weight = new_value;
            Ok(())
        }
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error> {
        if index < self.values.len() {
            self.values[index] = new_value;
            Ok(())
        } else {
            Err(Error::new(ErrorKind::InvalidInput, "Index out of bounds"))
        }
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values.get(self.header.class_index()).copied()
    }

    fn set_class_value(&mut self, new_value: f64) -> Result<(), Error> {
        let class_index = self.header.class_index();
        if class_index < self.values.len() {
            self.values[class_index] = new_value;
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::InvalidInput,
                "Class index out of bounds",
            ))
        }
    }

    fn is_class_missing(&self) -> bool {
        match self.class_value() {
            Some(v) => v.is_nan(),
            None => true,
        }
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn instance_id(&self) -> u64 {
        self.id
    }

    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::header_binary;

    #[test]
    fn class_value_and_missing_flag() {
        let h = header_binary();
        let mut inst = DenseInstance::new(Arc::clone(&h), vec![0.0, 1.0], 1.0);
        assert_eq!(inst.class_value(), Some(1.0));
        assert!(!inst.is_class_missing());

        inst.set_class_value(f64::NAN).unwrap();
        assert!(inst.is_class_missing());
    }

    #[test]
    fn identity_defaults_to_zero() {
        let h = header_binary();
        let inst = DenseInstance::new(Arc::clone(&h), vec![0.0, 0.0], 1.0);
        assert_eq!(inst.instance_id(), 0);
        assert_eq!(inst.timestamp(), 0.0);

        let tagged = DenseInstance::with_identity(h, vec![0.0, 0.0], 1.0, 42, 7.5);
        assert_eq!(tagged.instance_id(), 42);
        assert_eq!(tagged.timestamp(), 7.5);
    }

    #[test]
    fn negative_weight_rejected() {
        let h = header_binary();
        let mut inst = DenseInstance::new(h, vec![0.0, 0.0], 1.0);
        assert!(inst.set_weight(-1.0).is_err());
        assert!(inst.set_weight(2.0).is_ok());
        assert_eq!(inst.weight(), 2.0);
    }

    #[test]
    fn number_of_classes_from_header() {
        let h = header_binary();
        let inst = DenseInstance::new(h, vec![0.0, 0.0], 1.0);
        assert_eq!(inst.number_of_classes(), 2);
    }
}
