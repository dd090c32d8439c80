use crate::core::attributes::{Attribute, AttributeRef, NominalAttribute};

/// Schema of a labeled table: ordered attributes plus the position of the
/// class column. Every attribute other than the class one is a feature.
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

    pub fn number_of_features(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&(dyn Attribute + Send + Sync)> {
        self.attributes.get(index).map(|a| a.as_ref())
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// The class column, if it exists and is nominal.
    pub fn class_attribute(&self) -> Option<&NominalAttribute> {
        self.attributes
            .get(self.class_index)?
            .as_any()
            .downcast_ref::<NominalAttribute>()
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_attribute()
            .map(NominalAttribute::number_of_values)
            .unwrap_or(0)
    }

    pub fn class_name(&self, class: usize) -> Option<&str> {
        self.class_attribute()?.value_at(class)
    }

    /// Feature attributes in column order, skipping the class column.
    pub fn feature_attributes(&self) -> impl Iterator<Item = &AttributeRef> {
        self.attributes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.class_index)
            .map(|(_, a)| a)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{HexAttribute, NumericAttribute};
    use std::sync::Arc;

    fn header() -> InstanceHeader {
        let attrs: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("Time".into())),
            Arc::new(NominalAttribute::with_values("Label".into(), ["Benign", "Fuzzing"])),
            Arc::new(HexAttribute::new("Id".into())),
        ];
        InstanceHeader::new("can".into(), attrs, 1)
    }

    #[test]
    fn class_column_is_excluded_from_features() {
        let h = header();
        assert_eq!(h.number_of_attributes(), 3);
        assert_eq!(h.number_of_features(), 2);
        let names: Vec<&str> = h.feature_attributes().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Time", "Id"]);
    }

    #[test]
    fn class_lookup() {
        let h = header();
        assert_eq!(h.number_of_classes(), 2);
        assert_eq!(h.class_name(1), Some("Fuzzing"));
        assert_eq!(h.class_name(2), None);
        assert_eq!(h.index_of_attribute("Id"), Some(2));
        assert_eq!(h.column_names(), vec!["Time", "Label", "Id"]);
    }

    #[test]
    fn numeric_class_column_has_no_classes() {
        let attrs: Vec<AttributeRef> = vec![Arc::new(NumericAttribute::new("y".into()))];
        let h = InstanceHeader::new("r".into(), attrs, 0);
        assert!(h.class_attribute().is_none());
        assert_eq!(h.number_of_classes(), 0);
    }
}
