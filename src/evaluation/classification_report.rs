use crate::ensemble::ClassLabel;
use crate::evaluation::ScoreError;
use crate::evaluation::evaluators::cohen_kappa;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Scores of one class. Undefined ratios (no predictions of the class, or no
/// rows of it) are reported as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores<L> {
    pub class: L,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

/// Offline summary of a finished run: per-class scores plus overall and
/// support-weighted figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport<L> {
    pub classes: Vec<ClassScores<L>>,
    pub accuracy: f64,
    pub kappa: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
    pub total: u64,
}

impl<L: ClassLabel> ClassificationReport<L> {
    /// Classes appear in the order they are first met in `actual`, then in
    /// `predicted`.
    pub fn from_predictions(actual: &[L], predicted: &[L]) -> Result<Self, ScoreError> {
        if actual.len() != predicted.len() {
            return Err(ScoreError::LengthMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }
        if actual.is_empty() {
            return Err(ScoreError::Empty);
        }

        let mut order: Vec<L> = Vec::new();
        let mut index: HashMap<&L, usize> = HashMap::new();
        for label in actual.iter().chain(predicted) {
            if !index.contains_key(label) {
                index.insert(label, order.len());
                order.push(label.clone());
            }
        }

        let k = order.len();
        let mut support = vec![0u64; k];
        let mut predicted_counts = vec![0u64; k];
        let mut hits = vec![0u64; k];
        for (y, yhat) in actual.iter().zip(predicted) {
            let (y, yhat) = (index[y], index[yhat]);
            support[y] += 1;
            predicted_counts[yhat] += 1;
            if y == yhat {
                hits[y] += 1;
            }
        }

        let total = actual.len() as u64;
        let correct: u64 = hits.iter().sum();
        let accuracy = correct as f64 / total as f64;

        let classes: Vec<ClassScores<L>> = order
            .into_iter()
            .enumerate()
            .map(|(c, class)| {
                let precision = ratio(hits[c], predicted_counts[c]);
                let recall = ratio(hits[c], support[c]);
                ClassScores {
                    class,
                    precision,
                    recall,
                    f1: if precision + recall > 0.0 {
                        2.0 * precision * recall / (precision + recall)
                    } else {
                        0.0
                    },
                    support: support[c],
                }
            })
            .collect();

        let weighted = |score: fn(&ClassScores<L>) -> f64| {
            classes
                .iter()
                .map(|s| score(s) * s.support as f64)
                .sum::<f64>()
                / total as f64
        };

        Ok(ClassificationReport {
            accuracy,
            kappa: cohen_kappa(accuracy, &support, &predicted_counts),
            weighted_precision: weighted(|s| s.precision),
            weighted_recall: weighted(|s| s.recall),
            weighted_f1: weighted(|s| s.f1),
            total,
            classes,
        })
    }

    pub fn scores_for(&self, class: &L) -> Option<&ClassScores<L>> {
        self.classes.iter().find(|s| &s.class == class)
    }

    /// Per-class F1, the input expected by
    /// [`LeaderTable::from_class_scores`](crate::ensemble::LeaderTable::from_class_scores).
    pub fn class_f1(&self) -> Vec<(L, f64)> {
        self.classes
            .iter()
            .map(|s| (s.class.clone(), s.f1))
            .collect()
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl<L: ClassLabel> Display for ClassificationReport<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.classes.iter().map(|s| format!("{:?}", s.class)).collect();
        let width = names.iter().map(String::len).max().unwrap_or(0).max(12);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (name, s) in names.iter().zip(&self.classes) {
            writeln!(
                f,
                "{:>width$} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                name, s.precision, s.recall, s.f1, s.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>width$} {:>9} {:>9} {:>9.4} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        writeln!(
            f,
            "{:>width$} {:>9.4} {:>9.4} {:>9.4} {:>9}",
            "weighted avg", self.weighted_precision, self.weighted_recall, self.weighted_f1, self.total
        )?;
        write!(f, "{:>width$} {:>9.4}", "kappa", self.kappa)
    }
}
