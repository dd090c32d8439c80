use crate::core::attributes::{Attribute, ValueError};
use std::any::Any;

#[derive(Debug, Clone)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: String) -> NumericAttribute {
        NumericAttribute { name }
    }
}

impl Attribute for NumericAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parse_value(&self, raw: &str) -> Result<f64, ValueError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ValueError::new(&self.name, raw, "a decimal number"))
    }

    fn describe(&self) -> String {
        format!("{} numeric", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_point_timestamps() {
        let a = NumericAttribute::new("Time".into());
        assert_eq!(a.parse_value("1030000009.191851").unwrap(), 1030000009.191851);
        assert_eq!(a.parse_value(" 2 ").unwrap(), 2.0);
    }

    #[test]
    fn rejects_garbage() {
        let a = NumericAttribute::new("Time".into());
        let err = a.parse_value("abc").unwrap_err();
        assert_eq!(err.attribute, "Time");
        assert_eq!(err.raw, "abc");
    }
}
