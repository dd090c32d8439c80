pub mod attributes;
pub mod instance_header;
pub mod instances;

pub use instance_header::InstanceHeader;
