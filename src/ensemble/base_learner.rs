use crate::core::instances::FeatureRow;
use crate::ensemble::LearnerError;

/// A trained classifier taking part in the ensemble.
///
/// The ensemble makes no assumption about the model family. It only relies on
/// the two operations below:
///
/// - [`predict`] returns exactly one label for the row;
/// - [`predict_proba`] returns a distribution over classes whose maximum is
///   taken as the learner's confidence for that row.
///
/// Learners are shared between rows and, with
/// [`StreamingEvaluator::run_parallel`](crate::tasks::StreamingEvaluator::run_parallel),
/// between worker threads, hence the `Send + Sync` bound. A learner that keeps
/// mutable state (caches, counters) must synchronise it itself.
///
/// [`predict`]: BaseLearner::predict
/// [`predict_proba`]: BaseLearner::predict_proba
pub trait BaseLearner<L>: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<L, LearnerError>;

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, LearnerError>;
}
