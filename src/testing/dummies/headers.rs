use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use std::sync::Arc;

/// One numeric feature `x` followed by a nominal `class` column.
pub fn header_with_classes(classes: &[&str]) -> Arc<InstanceHeader> {
    let attributes: Vec<AttributeRef> = vec![
        Arc::new(NumericAttribute::new("x".into())),
        Arc::new(NominalAttribute::with_values(
            "class".into(),
            classes.iter().copied(),
        )),
    ];
    Arc::new(InstanceHeader::new("dummy".into(), attributes, 1))
}
