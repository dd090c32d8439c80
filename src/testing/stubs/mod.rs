pub mod constant_learner;
pub mod counting_learner;
pub mod echo_learner;
pub mod failing_learner;
pub mod vec_stream;

pub use constant_learner::ConstantLearner;
pub use counting_learner::{CallCounter, CountingLearner};
pub use echo_learner::EchoLearner;
pub use failing_learner::FailingLearner;
pub use vec_stream::VecStream;
