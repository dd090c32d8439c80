//! Decision fusion for one row.
//!
//! The verdict is reached through three mutually exclusive rules, checked in
//! order:
//!
//! 1. **Unanimous**: every learner predicts the same class; that class wins.
//! 2. **Total disagreement**: every learner predicts a different class. If
//!    exactly one learner is the leader of the class it predicted, its class
//!    wins ([`FusionRule::SoleLeader`]); otherwise the class of the most
//!    confident learner wins ([`FusionRule::MostConfident`]), the earliest
//!    record breaking confidence ties.
//! 3. **Mixed agreement**: the majority class is found (earliest first
//!    occurrence breaks frequency ties) and its leader is asked to classify
//!    the row again; that fresh answer is the verdict
//!    ([`FusionRule::MajorityLeader`]).

use crate::core::instances::FeatureRow;
use crate::ensemble::{ClassLabel, FusionError, LeaderTable, PredictionRecord};
use std::collections::HashSet;
use strum_macros::{Display, EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FusionRule {
    Unanimous,
    SoleLeader,
    MostConfident,
    MajorityLeader,
}

impl FusionRule {
    pub(crate) const COUNT: usize = 4;

    pub(crate) fn index(self) -> usize {
        match self {
            FusionRule::Unanimous => 0,
            FusionRule::SoleLeader => 1,
            FusionRule::MostConfident => 2,
            FusionRule::MajorityLeader => 3,
        }
    }
}

/// Fused label plus the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict<L> {
    pub label: L,
    pub rule: FusionRule,
}

pub fn fuse<L: ClassLabel>(
    records: &[PredictionRecord<'_, L>],
    leaders: &LeaderTable<L>,
    row: &FeatureRow,
) -> Result<L, FusionError> {
    fuse_with_rule(records, leaders, row).map(|v| v.label)
}

pub fn fuse_with_rule<L: ClassLabel>(
    records: &[PredictionRecord<'_, L>],
    leaders: &LeaderTable<L>,
    row: &FeatureRow,
) -> Result<Verdict<L>, FusionError> {
    let Some(first) = records.first() else {
        return Err(FusionError::EmptyEnsemble);
    };

    if all_equal(records) {
        return Ok(Verdict {
            label: first.predicted_class.clone(),
            rule: FusionRule::Unanimous,
        });
    }

    if all_distinct(records) {
        return leader_or_most_confident(records, leaders);
    }

    let majority = majority_class(records);
    let leader = leaders.leader_for(majority)?;
    Ok(Verdict {
        label: leader.predict(row)?,
        rule: FusionRule::MajorityLeader,
    })
}

fn all_equal<L: ClassLabel>(records: &[PredictionRecord<'_, L>]) -> bool {
    records
        .windows(2)
        .all(|w| w[0].predicted_class == w[1].predicted_class)
}

fn all_distinct<L: ClassLabel>(records: &[PredictionRecord<'_, L>]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|r| seen.insert(&r.predicted_class))
}

fn leader_or_most_confident<L: ClassLabel>(
    records: &[PredictionRecord<'_, L>],
    leaders: &LeaderTable<L>,
) -> Result<Verdict<L>, FusionError> {
    let mut self_leaders = Vec::new();
    for record in records {
        if leaders.is_leader(&record.predicted_class, record.learner)? {
            self_leaders.push(record);
        }
    }

    if let [only] = self_leaders.as_slice() {
        return Ok(Verdict {
            label: only.predicted_class.clone(),
            rule: FusionRule::SoleLeader,
        });
    }

    let mut best = &records[0];
    for record in &records[1..] {
        if outranks(record.highest_confidence, best.highest_confidence) {
            best = record;
        }
    }
    Ok(Verdict {
        label: best.predicted_class.clone(),
        rule: FusionRule::MostConfident,
    })
}

/// Strictly greater confidence, NaN ranking below every number.
fn outranks(candidate: f64, current: f64) -> bool {
    if current.is_nan() {
        !candidate.is_nan()
    } else {
        candidate > current
    }
}

/// Most frequent predicted class; on a frequency tie the class seen first wins.
fn majority_class<'r, L: ClassLabel>(records: &'r [PredictionRecord<'_, L>]) -> &'r L {
    // (class, count) in order of first occurrence
    let mut counts: Vec<(&L, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(c, _)| *c == &record.predicted_class) {
            Some((_, n)) => *n += 1,
            None => counts.push((&record.predicted_class, 1)),
        }
    }

    let mut winner = counts[0];
    for &(class, n) in &counts[1..] {
        if n > winner.1 {
            winner = (class, n);
        }
    }
    winner.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::LearnerHandle;
    use crate::testing::{ConstantLearner, CountingLearner, FailingLearner};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const BENIGN: usize = 0;
    const FUZZING: usize = 2;
    const MASQUERADE: usize = 4;

    fn learner(name: &str) -> LearnerHandle<usize> {
        LearnerHandle::new(name, ConstantLearner::new(BENIGN))
    }

    fn row() -> FeatureRow {
        FeatureRow::new(vec![1.0, 2.0])
    }

    #[test]
    fn two_models_agreeing_on_benign() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.3),
            PredictionRecord::new(&m2, BENIGN, 0.9),
        ];

        let verdict = fuse_with_rule(&records, &LeaderTable::default(), &row()).unwrap();
        assert_eq!(verdict.label, BENIGN);
        assert_eq!(verdict.rule, FusionRule::Unanimous);
    }

    #[test]
    fn unanimity_works_with_string_labels() {
        let m1: LearnerHandle<&'static str> = LearnerHandle::new("m1", ConstantLearner::new("x"));
        let m2: LearnerHandle<&'static str> = LearnerHandle::new("m2", ConstantLearner::new("x"));
        let records = vec![
            PredictionRecord::new(&m1, "Benign", 0.0),
            PredictionRecord::new(&m2, "Benign", 0.0),
        ];
        assert_eq!(fuse(&records, &LeaderTable::default(), &row()).unwrap(), "Benign");
    }

    #[test]
    fn single_model_is_trivially_unanimous() {
        let m1 = learner("m1");
        for class in [BENIGN, FUZZING, MASQUERADE, 69] {
            let records = vec![PredictionRecord::new(&m1, class, 0.1)];
            assert_eq!(fuse(&records, &LeaderTable::default(), &row()).unwrap(), class);
        }
    }

    #[test]
    fn only_self_leader_wins_on_total_disagreement() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.1),
            PredictionRecord::new(&m2, MASQUERADE, 1.0),
        ];
        // m1 leads both classes, so only m1 predicted a class it leads
        let leaders = LeaderTable::builder()
            .leader(BENIGN, &m1)
            .leader(MASQUERADE, &m1)
            .build();

        let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
        assert_eq!(verdict.label, BENIGN);
        assert_eq!(verdict.rule, FusionRule::SoleLeader);
    }

    #[test]
    fn no_self_leader_falls_back_to_confidence() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 1.0),
            PredictionRecord::new(&m2, MASQUERADE, 0.5),
        ];
        let leaders = LeaderTable::builder()
            .leader(BENIGN, &m2)
            .leader(MASQUERADE, &m1)
            .build();

        let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
        assert_eq!(verdict.label, BENIGN);
        assert_eq!(verdict.rule, FusionRule::MostConfident);
    }

    #[test]
    fn several_self_leaders_fall_back_to_confidence() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let m3 = learner("m3");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.6),
            PredictionRecord::new(&m2, FUZZING, 0.95),
            PredictionRecord::new(&m3, MASQUERADE, 0.7),
        ];
        let leaders = LeaderTable::builder()
            .leader(BENIGN, &m1)
            .leader(FUZZING, &m2)
            .leader(MASQUERADE, &m1)
            .build();

        let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
        assert_eq!(verdict.label, FUZZING);
        assert_eq!(verdict.rule, FusionRule::MostConfident);
    }

    #[test]
    fn confidence_tie_goes_to_first_record() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let m3 = learner("m3");
        let referee = learner("referee");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.4),
            PredictionRecord::new(&m2, MASQUERADE, 0.8),
            PredictionRecord::new(&m3, FUZZING, 0.8),
        ];
        let leaders = LeaderTable::builder()
            .leader(BENIGN, &referee)
            .leader(FUZZING, &referee)
            .leader(MASQUERADE, &referee)
            .build();

        assert_eq!(fuse(&records, &leaders, &row()).unwrap(), MASQUERADE);
    }

    #[test]
    fn nan_confidence_never_wins() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let m3 = learner("m3");
        let referee = learner("referee");
        let leaders = LeaderTable::builder()
            .leader(BENIGN, &referee)
            .leader(FUZZING, &referee)
            .leader(MASQUERADE, &referee)
            .build();

        let records = vec![
            PredictionRecord::new(&m1, BENIGN, f64::NAN),
            PredictionRecord::new(&m2, MASQUERADE, 1.0),
        ];
        let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
        assert_eq!(verdict.label, MASQUERADE);
        assert_eq!(verdict.rule, FusionRule::MostConfident);

        let records = vec![
            PredictionRecord::new(&m1, BENIGN, f64::NAN),
            PredictionRecord::new(&m2, MASQUERADE, f64::NAN),
            PredictionRecord::new(&m3, FUZZING, 0.0),
        ];
        assert_eq!(fuse(&records, &leaders, &row()).unwrap(), FUZZING);

        let records = vec![
            PredictionRecord::new(&m1, BENIGN, f64::NAN),
            PredictionRecord::new(&m2, MASQUERADE, f64::NAN),
        ];
        assert_eq!(fuse(&records, &leaders, &row()).unwrap(), BENIGN);
    }

    #[test]
    fn mixed_agreement_asks_the_majority_leader_again() {
        let m1 = LearnerHandle::new("m1", ConstantLearner::new(69usize));
        let m2 = learner("m2");
        let m3 = learner("m3");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.2),
            PredictionRecord::new(&m2, MASQUERADE, 0.9),
            PredictionRecord::new(&m3, BENIGN, 0.3),
        ];
        // only the majority class needs a leader
        let leaders = LeaderTable::builder().leader(BENIGN, &m1).build();

        let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
        assert_eq!(verdict.label, 69);
        assert_eq!(verdict.rule, FusionRule::MajorityLeader);
    }

    #[test]
    fn mixed_agreement_calls_predict_exactly_once() {
        let (counting, calls) = CountingLearner::new(7usize);
        let leader = LearnerHandle::new("leader", counting);
        let m2 = learner("m2");
        let m3 = learner("m3");
        let records = vec![
            PredictionRecord::new(&m2, FUZZING, 0.2),
            PredictionRecord::new(&m3, FUZZING, 0.3),
            PredictionRecord::new(&leader, BENIGN, 0.3),
        ];
        let leaders = LeaderTable::builder().leader(FUZZING, &leader).build();

        assert_eq!(fuse(&records, &leaders, &row()).unwrap(), 7);
        assert_eq!(calls.predictions(), 1);
    }

    #[test]
    fn majority_tie_goes_to_earliest_class() {
        let fuzz_leader = LearnerHandle::new("fuzz", ConstantLearner::new(100usize));
        let masq_leader = LearnerHandle::new("masq", ConstantLearner::new(200usize));
        let m = learner("m");
        // FUZZING and MASQUERADE both appear twice, FUZZING first
        let records = vec![
            PredictionRecord::new(&m, FUZZING, 0.1),
            PredictionRecord::new(&m, MASQUERADE, 0.1),
            PredictionRecord::new(&m, MASQUERADE, 0.1),
            PredictionRecord::new(&m, FUZZING, 0.1),
            PredictionRecord::new(&m, BENIGN, 0.9),
        ];
        let leaders = LeaderTable::builder()
            .leader(FUZZING, &fuzz_leader)
            .leader(MASQUERADE, &masq_leader)
            .build();

        assert_eq!(fuse(&records, &leaders, &row()).unwrap(), 100);
    }

    #[test]
    fn missing_majority_leader_aborts() {
        let m = learner("m");
        let records = vec![
            PredictionRecord::new(&m, BENIGN, 0.1),
            PredictionRecord::new(&m, BENIGN, 0.1),
            PredictionRecord::new(&m, FUZZING, 0.1),
        ];
        let leaders = LeaderTable::builder().leader(FUZZING, &m).build();

        let err = fuse(&records, &leaders, &row()).unwrap_err();
        assert!(matches!(err, FusionError::MissingLeader { ref class } if class == "0"));
    }

    #[test]
    fn missing_leader_on_total_disagreement_aborts() {
        let m1 = learner("m1");
        let m2 = learner("m2");
        let records = vec![
            PredictionRecord::new(&m1, BENIGN, 0.9),
            PredictionRecord::new(&m2, FUZZING, 0.1),
        ];
        let leaders = LeaderTable::builder().leader(BENIGN, &m2).build();

        assert!(matches!(
            fuse(&records, &leaders, &row()),
            Err(FusionError::MissingLeader { .. })
        ));
    }

    #[test]
    fn failing_majority_leader_is_propagated() {
        let broken: LearnerHandle<usize> = LearnerHandle::new("broken", FailingLearner::new("gpu lost"));
        let m = learner("m");
        let records = vec![
            PredictionRecord::new(&m, BENIGN, 0.1),
            PredictionRecord::new(&m, BENIGN, 0.1),
            PredictionRecord::new(&m, FUZZING, 0.1),
        ];
        let leaders = LeaderTable::builder().leader(BENIGN, &broken).build();

        let err = fuse(&records, &leaders, &row()).unwrap_err();
        assert!(matches!(err, FusionError::Learner { ref learner, .. } if learner == "broken"));
    }

    #[test]
    fn empty_record_set_is_rejected() {
        let records: Vec<PredictionRecord<'_, usize>> = Vec::new();
        assert!(matches!(
            fuse(&records, &LeaderTable::default(), &row()),
            Err(FusionError::EmptyEnsemble)
        ));
    }

    fn confidences(rng: &mut StdRng, n: usize) -> Vec<f64> {
        // coarse grid so that ties actually happen
        (0..n).map(|_| rng.random_range(0..=4) as f64 / 4.0).collect()
    }

    #[test]
    fn random_unanimous_ensembles_return_the_shared_class() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.random_range(1..=6);
            let class = rng.random_range(0..5usize);
            let handles: Vec<_> = (0..n).map(|i| learner(&format!("m{i}"))).collect();
            let conf = confidences(&mut rng, n);
            let records: Vec<_> = handles
                .iter()
                .zip(&conf)
                .map(|(h, &c)| PredictionRecord::new(h, class, c))
                .collect();

            let verdict = fuse_with_rule(&records, &LeaderTable::default(), &row()).unwrap();
            assert_eq!(verdict.label, class);
            assert_eq!(verdict.rule, FusionRule::Unanimous);
        }
    }

    #[test]
    fn random_disagreement_with_one_self_leader() {
        let mut rng = StdRng::seed_from_u64(11);
        let referee = learner("referee");
        for _ in 0..200 {
            let n = rng.random_range(2..=5);
            let mut classes: Vec<usize> = (0..8).collect();
            classes.shuffle(&mut rng);
            classes.truncate(n);
            let handles: Vec<_> = (0..n).map(|i| learner(&format!("m{i}"))).collect();
            let chosen = rng.random_range(0..n);

            let mut builder = LeaderTable::builder();
            for (i, &class) in classes.iter().enumerate() {
                let lead = if i == chosen { &handles[i] } else { &referee };
                builder = builder.leader(class, lead);
            }
            let leaders = builder.build();

            let conf = confidences(&mut rng, n);
            let records: Vec<_> = (0..n)
                .map(|i| PredictionRecord::new(&handles[i], classes[i], conf[i]))
                .collect();

            let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
            assert_eq!(verdict.label, classes[chosen]);
            assert_eq!(verdict.rule, FusionRule::SoleLeader);
        }
    }

    #[test]
    fn random_disagreement_without_self_leader_picks_first_most_confident() {
        let mut rng = StdRng::seed_from_u64(13);
        let referee = learner("referee");
        for _ in 0..200 {
            let n = rng.random_range(2..=5);
            let mut classes: Vec<usize> = (0..8).collect();
            classes.shuffle(&mut rng);
            classes.truncate(n);
            let handles: Vec<_> = (0..n).map(|i| learner(&format!("m{i}"))).collect();

            let mut builder = LeaderTable::builder();
            for &class in &classes {
                builder = builder.leader(class, &referee);
            }
            let leaders = builder.build();

            let conf = confidences(&mut rng, n);
            let records: Vec<_> = (0..n)
                .map(|i| PredictionRecord::new(&handles[i], classes[i], conf[i]))
                .collect();

            let top = conf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let first_top = conf.iter().position(|&c| c == top).unwrap();

            let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
            assert_eq!(verdict.label, classes[first_top]);
            assert_eq!(verdict.rule, FusionRule::MostConfident);
        }
    }

    #[test]
    fn random_mixed_agreement_uses_fresh_leader_prediction() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let n = rng.random_range(3..=7);
            let handles: Vec<_> = (0..n).map(|i| learner(&format!("m{i}"))).collect();
            let mut classes: Vec<usize> = (0..n).map(|_| rng.random_range(0..3)).collect();
            // force at least one repeat and at least two distinct classes
            classes[1] = classes[0];
            if classes.iter().all(|&c| c == classes[0]) {
                classes[n - 1] = (classes[0] + 1) % 3;
            }

            // each class leader answers 1000 + class, never a cached prediction
            let class_leaders: Vec<_> = (0..3)
                .map(|c| LearnerHandle::new(format!("lead{c}"), ConstantLearner::new(1000 + c)))
                .collect();
            let mut builder = LeaderTable::builder();
            for (c, h) in class_leaders.iter().enumerate() {
                builder = builder.leader(c, h);
            }
            let leaders = builder.build();

            let records: Vec<_> = (0..n)
                .map(|i| PredictionRecord::new(&handles[i], classes[i], 0.5))
                .collect();

            let mut counts = [0usize; 3];
            for &c in &classes {
                counts[c] += 1;
            }
            let max = *counts.iter().max().unwrap();
            let majority = *classes.iter().find(|&&c| counts[c] == max).unwrap();

            let verdict = fuse_with_rule(&records, &leaders, &row()).unwrap();
            assert_eq!(verdict.label, 1000 + majority);
            assert_eq!(verdict.rule, FusionRule::MajorityLeader);
        }
    }
}
