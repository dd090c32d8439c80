use crate::core::attributes::{Attribute, ValueError};
use std::any::Any;

/// Hex encoded integer column, such as a CAN arbitration id (`354`) or a
/// payload byte (`0A`).
#[derive(Debug, Clone)]
pub struct HexAttribute {
    pub name: String,
}

impl HexAttribute {
    pub fn new(name: String) -> HexAttribute {
        HexAttribute { name }
    }
}

impl Attribute for HexAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parse_value(&self, raw: &str) -> Result<f64, ValueError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(|v| v as f64)
            .map_err(|_| ValueError::new(&self.name, raw, "a hex integer"))
    }

    fn describe(&self) -> String {
        format!("{} hex", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_bytes() {
        let a = HexAttribute::new("Id".into());
        assert_eq!(a.parse_value("354").unwrap(), 852.0);
        assert_eq!(a.parse_value("0A").unwrap(), 10.0);
        assert_eq!(a.parse_value("0xff").unwrap(), 255.0);
    }

    #[test]
    fn empty_field_is_an_error() {
        let a = HexAttribute::new("Byte1".into());
        assert!(a.parse_value("").is_err());
        assert!(a.parse_value("ZZ").is_err());
    }
}
