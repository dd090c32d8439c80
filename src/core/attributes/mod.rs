mod attribute;
mod hex_attribute;
mod nominal_attribute;
mod numeric_attribute;

pub use attribute::Attribute;
pub use attribute::AttributeRef;
pub use attribute::ValueError;
pub use hex_attribute::HexAttribute;
pub use nominal_attribute::NominalAttribute;
pub use numeric_attribute::NumericAttribute;
