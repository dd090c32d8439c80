use crate::core::instances::FeatureRow;
use crate::ensemble::{ClassLabel, FusionError, LearnerError, LearnerHandle};

/// One learner's opinion about one row.
///
/// Records are built fresh for every row and dropped once the row has been
/// fused; nothing is written back onto the learner.
#[derive(Debug, Clone)]
pub struct PredictionRecord<'a, L: ClassLabel> {
    pub learner: &'a LearnerHandle<L>,
    pub predicted_class: L,
    pub highest_confidence: f64,
}

impl<'a, L: ClassLabel> PredictionRecord<'a, L> {
    pub fn new(
        learner: &'a LearnerHandle<L>,
        predicted_class: L,
        highest_confidence: f64,
    ) -> PredictionRecord<'a, L> {
        PredictionRecord {
            learner,
            predicted_class,
            highest_confidence,
        }
    }

    /// Runs both learner operations on `row`.
    pub fn collect(
        learner: &'a LearnerHandle<L>,
        row: &FeatureRow,
    ) -> Result<PredictionRecord<'a, L>, FusionError> {
        let predicted_class = learner.predict(row)?;
        let proba = learner.predict_proba(row)?;
        let highest_confidence = highest_confidence(&proba)
            .ok_or_else(|| learner.failure(LearnerError::EmptyDistribution))?;
        Ok(PredictionRecord::new(
            learner,
            predicted_class,
            highest_confidence,
        ))
    }
}

/// Maximum of a class distribution, ignoring NaN entries.
pub fn highest_confidence(proba: &[f64]) -> Option<f64> {
    proba
        .iter()
        .copied()
        .filter(|p| !p.is_nan())
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ConstantLearner;

    #[test]
    fn highest_confidence_is_the_maximum() {
        assert_eq!(highest_confidence(&[0.1, 0.7, 0.2]), Some(0.7));
        assert_eq!(highest_confidence(&[0.0]), Some(0.0));
        assert_eq!(highest_confidence(&[f64::NAN, 0.4]), Some(0.4));
        assert_eq!(highest_confidence(&[]), None);
        assert_eq!(highest_confidence(&[f64::NAN]), None);
    }

    #[test]
    fn collect_fills_class_and_confidence() {
        let h = LearnerHandle::new("m1", ConstantLearner::with_proba(4usize, vec![0.05, 0.9, 0.05]));
        let row = FeatureRow::new(vec![1.0, 2.0]);
        let r = PredictionRecord::collect(&h, &row).unwrap();
        assert_eq!(r.predicted_class, 4);
        assert_eq!(r.highest_confidence, 0.9);
        assert!(r.learner.is(&h));
    }

    #[test]
    fn empty_distribution_is_a_learner_failure() {
        let h = LearnerHandle::new("m1", ConstantLearner::with_proba(0usize, vec![]));
        let err = PredictionRecord::collect(&h, &FeatureRow::default()).unwrap_err();
        assert!(matches!(
            err,
            FusionError::Learner {
                source: LearnerError::EmptyDistribution,
                ..
            }
        ));
    }
}
