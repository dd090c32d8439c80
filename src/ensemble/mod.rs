//! Leader Class and Confidence Decision Ensemble.
//!
//! Several independently trained [`BaseLearner`]s classify the same row; the
//! [`fusion`] step turns their per-row [`PredictionRecord`]s into a single
//! verdict, consulting a [`LeaderTable`] that names the learner trusted most
//! for each class.

mod base_learner;
mod error;
pub mod fusion;
mod label;
mod leader_table;
mod learner_handle;
mod prediction_record;

pub use base_learner::BaseLearner;
pub use error::{FusionError, LearnerError};
pub use fusion::{FusionRule, Verdict, fuse, fuse_with_rule};
pub use label::ClassLabel;
pub use leader_table::{LeaderTable, LeaderTableBuilder};
pub use learner_handle::{LearnerHandle, LearnerId};
pub use prediction_record::{PredictionRecord, highest_confidence};
