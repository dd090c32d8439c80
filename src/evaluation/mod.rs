//! Scoring of fused predictions against true labels, both online while a run
//! progresses and as a final per-class report.

mod classification_report;
mod error;
mod estimators;
mod evaluators;
mod measurement;

pub use classification_report::{ClassScores, ClassificationReport};
pub use error::ScoreError;
pub use estimators::{Estimator, MeanEstimator};
pub use evaluators::{
    ClassificationEvaluator, PerformanceEvaluator, PerformanceEvaluatorExt, cohen_kappa,
};
pub use measurement::Measurement;
