use crate::core::instances::FeatureRow;
use crate::ensemble::{BaseLearner, ClassLabel, FusionError};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LEARNER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a learner.
///
/// Two handles wrapping behaviourally identical learners still get different
/// ids; clones of one handle share the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LearnerId(u64);

impl LearnerId {
    fn next() -> LearnerId {
        LearnerId(NEXT_LEARNER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for LearnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named, shareable reference to a base learner.
///
/// Leader lookups compare [`LearnerId`]s, never labels or learner contents.
pub struct LearnerHandle<L> {
    id: LearnerId,
    name: Arc<str>,
    learner: Arc<dyn BaseLearner<L>>,
}

impl<L: ClassLabel> LearnerHandle<L> {
    pub fn new<B>(name: impl Into<String>, learner: B) -> LearnerHandle<L>
    where
        B: BaseLearner<L> + 'static,
    {
        Self::from_arc(name, Arc::new(learner))
    }

    pub fn from_arc(name: impl Into<String>, learner: Arc<dyn BaseLearner<L>>) -> LearnerHandle<L> {
        LearnerHandle {
            id: LearnerId::next(),
            name: Arc::from(name.into()),
            learner,
        }
    }

    pub fn id(&self) -> LearnerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, other: &LearnerHandle<L>) -> bool {
        self.id == other.id
    }

    pub fn predict(&self, row: &FeatureRow) -> Result<L, FusionError> {
        self.learner
            .predict(row)
            .map_err(|source| self.failure(source))
    }

    pub fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, FusionError> {
        self.learner
            .predict_proba(row)
            .map_err(|source| self.failure(source))
    }

    pub(crate) fn failure(&self, source: crate::ensemble::LearnerError) -> FusionError {
        FusionError::Learner {
            learner: self.name.to_string(),
            source,
        }
    }
}

impl<L> Clone for LearnerHandle<L> {
    fn clone(&self) -> Self {
        LearnerHandle {
            id: self.id,
            name: Arc::clone(&self.name),
            learner: Arc::clone(&self.learner),
        }
    }
}

impl<L> Debug for LearnerHandle<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnerHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::LearnerError;
    use crate::testing::{ConstantLearner, FailingLearner};

    #[test]
    fn identical_learners_get_distinct_ids() {
        let a = LearnerHandle::new("a", ConstantLearner::new(1usize));
        let b = LearnerHandle::new("a", ConstantLearner::new(1usize));
        assert_ne!(a.id(), b.id());
        assert!(!a.is(&b));
    }

    #[test]
    fn clones_share_identity() {
        let a = LearnerHandle::new("xgb", ConstantLearner::new("Benign"));
        let c = a.clone();
        assert!(a.is(&c));
        assert_eq!(c.name(), "xgb");
    }

    #[test]
    fn delegates_to_the_learner() {
        let h = LearnerHandle::new("lgbm", ConstantLearner::with_proba(3usize, vec![0.2, 0.8]));
        let row = FeatureRow::new(vec![0.0]);
        assert_eq!(h.predict(&row).unwrap(), 3);
        assert_eq!(h.predict_proba(&row).unwrap(), vec![0.2, 0.8]);
    }

    #[test]
    fn learner_errors_carry_the_learner_name() {
        let h: LearnerHandle<usize> = LearnerHandle::new("cat", FailingLearner::new("boom"));
        let err = h.predict(&FeatureRow::default()).unwrap_err();
        match err {
            FusionError::Learner { learner, source } => {
                assert_eq!(learner, "cat");
                assert!(matches!(source, LearnerError::Inference(ref m) if m == "boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
