use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("{actual} true labels but {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },

    #[error("nothing to score")]
    Empty,
}
