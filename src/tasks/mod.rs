mod error;
mod output;
mod progress;
mod streaming_evaluator;

pub use error::RunError;
pub use output::{EvaluationOutput, RuleTally};
pub use progress::Progress;
pub use streaming_evaluator::{EvaluatorConfig, StreamingEvaluator, fuse_row};
