use crate::core::instances::FeatureRow;
use crate::ensemble::{BaseLearner, LearnerError};

/// Reads the class straight out of a feature column, optionally shifted.
///
/// With `offset = 0` on rows whose feature holds the true class this is an
/// oracle; with a non-zero offset it is always wrong in a predictable way.
#[derive(Debug, Clone)]
pub struct EchoLearner {
    column: usize,
    offset: usize,
    modulus: usize,
    confidence: f64,
}

impl EchoLearner {
    pub fn oracle(column: usize) -> Self {
        Self {
            column,
            offset: 0,
            modulus: usize::MAX,
            confidence: 1.0,
        }
    }

    /// Predicts `(feature + offset) % modulus`.
    pub fn shifted(column: usize, offset: usize, modulus: usize) -> Self {
        Self {
            column,
            offset,
            modulus,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

impl BaseLearner<usize> for EchoLearner {
    fn predict(&self, row: &FeatureRow) -> Result<usize, LearnerError> {
        let v = row
            .value_at_index(self.column)
            .ok_or_else(|| LearnerError::Inference(format!("row has no column {}", self.column)))?;
        Ok((v as usize).wrapping_add(self.offset) % self.modulus)
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, LearnerError> {
        Ok(vec![self.confidence, 1.0 - self.confidence])
    }
}
