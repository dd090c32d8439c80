use crate::core::attributes::{Attribute, ValueError};
use std::any::Any;
use std::collections::HashMap;

/// Attribute with a closed set of string values, encoded by position.
#[derive(Debug, Clone)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values<I, S>(name: String, values: I) -> NominalAttribute
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    pub fn enumerate_values(&self) -> impl Iterator<Item = (usize, &String)> {
        self.values.iter().enumerate()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parse_value(&self, raw: &str) -> Result<f64, ValueError> {
        self.index_of_value(raw.trim())
            .map(|i| i as f64)
            .ok_or_else(|| ValueError::new(&self.name, raw, "a declared nominal value"))
    }

    fn describe(&self) -> String {
        format!("{} {{ {} }}", self.name, self.values.join(", "))
    }
}
