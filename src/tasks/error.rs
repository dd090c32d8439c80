use crate::ensemble::FusionError;
use std::error::Error as StdError;
use thiserror::Error;

/// Why a fused evaluation run stopped. Row numbers are 1-based.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid evaluator configuration: {0}")]
    InvalidConfig(String),

    #[error("row {row}: {source}")]
    Fusion {
        row: u64,
        #[source]
        source: FusionError,
    },

    #[error("row {row}: unreadable input")]
    Input {
        row: u64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}
