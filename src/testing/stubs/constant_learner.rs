use crate::core::instances::FeatureRow;
use crate::ensemble::{BaseLearner, ClassLabel, LearnerError};

/// Always predicts the same label with the same distribution.
#[derive(Debug, Clone)]
pub struct ConstantLearner<L> {
    prediction: L,
    proba: Vec<f64>,
}

impl<L: ClassLabel> ConstantLearner<L> {
    pub fn new(prediction: L) -> Self {
        Self::with_proba(prediction, vec![1.0])
    }

    pub fn with_proba(prediction: L, proba: Vec<f64>) -> Self {
        Self { prediction, proba }
    }
}

impl<L: ClassLabel> BaseLearner<L> for ConstantLearner<L> {
    fn predict(&self, _row: &FeatureRow) -> Result<L, LearnerError> {
        Ok(self.prediction.clone())
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, LearnerError> {
        Ok(self.proba.clone())
    }
}
