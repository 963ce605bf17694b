use crate::core::attributes::{AttributeRef, NominalAttribute};

/// Immutable schema shared by every instance of a stream.
pub struct InstanceHeader {
    pub relation_name: String,
    pub attributes: Vec<AttributeRef>,
    pub class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&AttributeRef> {
        self.attributes.get(index)
    }

    /// Number of classes declared by the (nominal) class attribute,
    /// or 0 when the class attribute is missing or numeric.
    pub fn number_of_classes(&self) -> usize {
        match self.attributes.get(self.class_index) {
            Some(attr) => attr
                .as_any()
                .downcast_ref::<NominalAttribute>()
                .map(|nominal| nominal.values.len())
                .unwrap_or(0),
            None => 0,
        }
    }
}
