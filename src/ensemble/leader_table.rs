use crate::ensemble::{ClassLabel, FusionError, LearnerHandle};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Class label -> the learner trusted most for that class.
///
/// Built once before inference and immutable afterwards, so a single table can
/// be shared (e.g. behind an `Arc`) by concurrent fusion runs.
pub struct LeaderTable<L: ClassLabel> {
    leaders: HashMap<L, LearnerHandle<L>>,
}

impl<L: ClassLabel> LeaderTable<L> {
    pub fn builder() -> LeaderTableBuilder<L> {
        LeaderTableBuilder {
            leaders: HashMap::new(),
        }
    }

    /// Picks, for every class, the candidate with the highest score for that
    /// class (typically the per-class F1 measured on held-out data). The first
    /// candidate wins ties; NaN scores are ignored.
    pub fn from_class_scores<I, S>(candidates: I) -> LeaderTable<L>
    where
        I: IntoIterator<Item = (LearnerHandle<L>, S)>,
        S: IntoIterator<Item = (L, f64)>,
    {
        let mut best: HashMap<L, (f64, LearnerHandle<L>)> = HashMap::new();
        for (learner, scores) in candidates {
            for (class, score) in scores {
                if score.is_nan() {
                    continue;
                }
                let improves = best
                    .get(&class)
                    .is_none_or(|(current, _)| score > *current);
                if improves {
                    best.insert(class, (score, learner.clone()));
                }
            }
        }
        LeaderTable {
            leaders: best
                .into_iter()
                .map(|(class, (_, learner))| (class, learner))
                .collect(),
        }
    }

    pub fn get(&self, class: &L) -> Option<&LearnerHandle<L>> {
        self.leaders.get(class)
    }

    pub fn leader_for(&self, class: &L) -> Result<&LearnerHandle<L>, FusionError> {
        self.leaders
            .get(class)
            .ok_or_else(|| FusionError::MissingLeader {
                class: format!("{class:?}"),
            })
    }

    /// Whether `learner` is the designated leader for `class`.
    pub fn is_leader(&self, class: &L, learner: &LearnerHandle<L>) -> Result<bool, FusionError> {
        Ok(self.leader_for(class)?.is(learner))
    }

    pub fn contains_class(&self, class: &L) -> bool {
        self.leaders.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &L> {
        self.leaders.keys()
    }

    pub fn len(&self) -> usize {
        self.leaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaders.is_empty()
    }
}

impl<L: ClassLabel> Default for LeaderTable<L> {
    fn default() -> Self {
        LeaderTable {
            leaders: HashMap::new(),
        }
    }
}

impl<L: ClassLabel> FromIterator<(L, LearnerHandle<L>)> for LeaderTable<L> {
    fn from_iter<T: IntoIterator<Item = (L, LearnerHandle<L>)>>(iter: T) -> Self {
        LeaderTable {
            leaders: iter.into_iter().collect(),
        }
    }
}

impl<L: ClassLabel> Debug for LeaderTable<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.leaders.iter().map(|(c, l)| (c, l.name())))
            .finish()
    }
}

pub struct LeaderTableBuilder<L: ClassLabel> {
    leaders: HashMap<L, LearnerHandle<L>>,
}

impl<L: ClassLabel> LeaderTableBuilder<L> {
    /// Registers `learner` as leader of `class`, replacing any earlier entry.
    pub fn leader(mut self, class: L, learner: &LearnerHandle<L>) -> Self {
        self.leaders.insert(class, learner.clone());
        self
    }

    pub fn build(self) -> LeaderTable<L> {
        LeaderTable {
            leaders: self.leaders,
        }
    }
}
