use crate::core::instances::FeatureRow;
use crate::ensemble::{BaseLearner, LearnerError};

/// Fails every call with the configured message.
#[derive(Debug, Clone)]
pub struct FailingLearner {
    message: String,
}

impl FailingLearner {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl<L> BaseLearner<L> for FailingLearner {
    fn predict(&self, _row: &FeatureRow) -> Result<L, LearnerError> {
        Err(LearnerError::Inference(self.message.clone()))
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, LearnerError> {
        Err(LearnerError::Inference(self.message.clone()))
    }
}
