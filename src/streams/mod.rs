mod csv_file_stream;
mod error;
pub mod stream;

pub use csv_file_stream::CsvFileStream;
pub use error::StreamError;
pub use stream::{Stream, StreamInstances};
