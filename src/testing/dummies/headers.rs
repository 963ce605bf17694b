use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use std::collections::HashMap;
use std::sync::Arc;

/// One numeric feature plus a binary class, class at index 1.
pub fn header_binary() -> Arc<InstanceHeader> {
    header_nominal(2)
}

/// One numeric feature plus a `num_classes`-valued class, class at index 1.
pub fn header_nominal(num_classes: usize) -> Arc<InstanceHeader> {
    let values: Vec<String> = (0..num_classes).map(|i| format!("c{i}")).collect();
    let mut map = HashMap::new();
    for (i, v) in values.iter().enumerate() {
        map.insert(v.clone(), i);
    }
    let feature = Arc::new(NumericAttribute::new("x".into())) as AttributeRef;
    let class_attribute =
        Arc::new(NominalAttribute::with_values("class".into(), values, map)) as AttributeRef;

    Arc::new(InstanceHeader::new(
        "synthetic".into(),
        vec![feature, class_attribute],
        1,
    ))
}
