use crate::core::instances::FeatureRow;
use crate::ensemble::{BaseLearner, ClassLabel, LearnerError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Constant learner that records how often it is asked.
pub struct CountingLearner<L> {
    prediction: L,
    counter: CallCounter,
}

#[derive(Clone, Default)]
pub struct CallCounter {
    predictions: Arc<AtomicUsize>,
    distributions: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn predictions(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }

    pub fn distributions(&self) -> usize {
        self.distributions.load(Ordering::SeqCst)
    }
}

impl<L: ClassLabel> CountingLearner<L> {
    pub fn new(prediction: L) -> (Self, CallCounter) {
        let counter = CallCounter::default();
        (
            Self {
                prediction,
                counter: counter.clone(),
            },
            counter,
        )
    }
}

impl<L: ClassLabel> BaseLearner<L> for CountingLearner<L> {
    fn predict(&self, _row: &FeatureRow) -> Result<L, LearnerError> {
        self.counter.predictions.fetch_add(1, Ordering::SeqCst);
        Ok(self.prediction.clone())
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, LearnerError> {
        self.counter.distributions.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1.0])
    }
}
