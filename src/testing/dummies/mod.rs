mod headers;

pub use headers::header_with_classes;
