use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

/// One column of a labeled table.
///
/// Every attribute knows how to turn a raw field into the `f64` encoding
/// stored in a [`FeatureRow`](crate::core::instances::FeatureRow): decimal
/// values are kept as is, hex fields become their integer value and nominal
/// values become their index.
pub trait Attribute: Any {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn parse_value(&self, raw: &str) -> Result<f64, ValueError>;

    /// Short human readable form, e.g. `Id hex`.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("attribute '{attribute}': cannot read '{raw}' as {expected}")]
pub struct ValueError {
    pub attribute: String,
    pub raw: String,
    pub expected: &'static str,
}

impl ValueError {
    pub fn new(attribute: &str, raw: &str, expected: &'static str) -> Self {
        Self {
            attribute: attribute.to_string(),
            raw: raw.to_string(),
            expected,
        }
    }
}
