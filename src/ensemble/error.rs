use thiserror::Error;

/// Failure raised by a base learner's own inference code.
#[derive(Debug, Error)]
pub enum LearnerError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("confidence distribution is empty or entirely NaN")]
    EmptyDistribution,

    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("cannot fuse an empty set of predictions")]
    EmptyEnsemble,

    #[error("no leader learner registered for class {class}")]
    MissingLeader { class: String },

    #[error("learner '{learner}' failed")]
    Learner {
        learner: String,
        #[source]
        source: LearnerError,
    },
}
