use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("timestamp '{0}' is not a number")]
    BadTimestamp(String),

    #[error("frame '{0}' has no '#' separator")]
    MissingSeparator(String),
}

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {source}")]
    Capture {
        line: u64,
        #[source]
        source: CaptureError,
    },

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{} does not share the schema of the first input: expected {expected:?}, found {found:?}", path.display())]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("no input files given")]
    NoInputs,
}
