mod classification_evaluator;
mod performance_evaluator;

pub use classification_evaluator::{ClassificationEvaluator, cohen_kappa};
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
