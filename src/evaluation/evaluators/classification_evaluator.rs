use crate::ensemble::ClassLabel;
use crate::evaluation::{Estimator, MeanEstimator, Measurement, PerformanceEvaluator};
use std::collections::HashMap;

/// Online evaluator of single-label predictions.
///
/// Tracks:
/// - overall accuracy;
/// - marginals of true and predicted classes for Cohen's kappa;
/// - per-class precision (correct among predictions of the class) and recall
///   (correct among rows of the class), summarized as support-weighted
///   averages.
///
/// Classes are indexed in the order they are first seen, unless seeded with
/// [`ClassificationEvaluator::with_classes`]. Per-class measurements are named
/// `precision_class_{i}`, `recall_class_{i}` and `f1_class_{i}`.
pub struct ClassificationEvaluator<L: ClassLabel, E: Estimator + Default = MeanEstimator> {
    classes: Vec<L>,
    index: HashMap<L, usize>,
    correct: E,
    actual_counts: Vec<u64>,
    predicted_counts: Vec<u64>,
    precision: Vec<E>,
    recall: Vec<E>,
    total: u64,
    per_class: bool,
}

impl<L: ClassLabel, E: Estimator + Default> ClassificationEvaluator<L, E> {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            index: HashMap::new(),
            correct: E::default(),
            actual_counts: Vec::new(),
            predicted_counts: Vec::new(),
            precision: Vec::new(),
            recall: Vec::new(),
            total: 0,
            per_class: false,
        }
    }

    /// Fixes the index of the given classes up front.
    pub fn with_classes<I: IntoIterator<Item = L>>(classes: I) -> Self {
        let mut ev = Self::new();
        for class in classes {
            ev.class_index(&class);
        }
        ev
    }

    /// Also report per-class precision, recall and F1.
    pub fn per_class(mut self, enabled: bool) -> Self {
        self.per_class = enabled;
        self
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    fn class_index(&mut self, class: &L) -> usize {
        if let Some(&i) = self.index.get(class) {
            return i;
        }
        let i = self.classes.len();
        self.classes.push(class.clone());
        self.index.insert(class.clone(), i);
        self.actual_counts.push(0);
        self.predicted_counts.push(0);
        self.precision.push(E::default());
        self.recall.push(E::default());
        i
    }

    fn class_f1(&self, c: usize) -> f64 {
        f1(self.precision[c].estimation(), self.recall[c].estimation())
    }

    fn weighted(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        let mut sum = 0.0;
        for (c, &support) in self.actual_counts.iter().enumerate() {
            if support == 0 {
                continue;
            }
            let v = per_class(c);
            if v.is_finite() {
                sum += v * support as f64;
            }
        }
        sum / self.total as f64
    }
}

impl<L: ClassLabel, E: Estimator + Default> Default for ClassificationEvaluator<L, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ClassLabel, E: Estimator + Default> PerformanceEvaluator for ClassificationEvaluator<L, E> {
    type Label = L;

    fn reset(&mut self) {
        let classes = std::mem::take(&mut self.classes);
        let per_class = self.per_class;
        *self = Self::with_classes(classes).per_class(per_class);
    }

    fn add_result(&mut self, actual: &L, predicted: &L) {
        let y = self.class_index(actual);
        let yhat = self.class_index(predicted);
        let hit = if y == yhat { 1.0 } else { 0.0 };

        self.total += 1;
        self.correct.add(hit);
        self.actual_counts[y] += 1;
        self.predicted_counts[yhat] += 1;
        self.precision[yhat].add(hit);
        self.recall[y].add(hit);
    }

    fn performance(&self) -> Vec<Measurement> {
        let accuracy = self.correct.estimation();
        let mut m = vec![Measurement::new("accuracy", accuracy)];

        if self.total == 0 {
            m.push(Measurement::new("kappa", 0.0));
            return m;
        }

        m.push(Measurement::new(
            "kappa",
            cohen_kappa(accuracy, &self.actual_counts, &self.predicted_counts),
        ));
        m.push(Measurement::new(
            "precision",
            self.weighted(|c| self.precision[c].estimation()),
        ));
        m.push(Measurement::new(
            "recall",
            self.weighted(|c| self.recall[c].estimation()),
        ));
        m.push(Measurement::new("f1", self.weighted(|c| self.class_f1(c))));

        if self.per_class {
            for c in 0..self.classes.len() {
                m.push(Measurement::new(
                    format!("precision_class_{c}"),
                    self.precision[c].estimation(),
                ));
                m.push(Measurement::new(
                    format!("recall_class_{c}"),
                    self.recall[c].estimation(),
                ));
                m.push(Measurement::new(format!("f1_class_{c}"), self.class_f1(c)));
            }
        }
        m
    }
}

pub(crate) fn f1(precision: f64, recall: f64) -> f64 {
    let s = precision + recall;
    if precision.is_finite() && recall.is_finite() && s > f64::EPSILON {
        2.0 * precision * recall / s
    } else if precision.is_finite() && recall.is_finite() {
        0.0
    } else {
        f64::NAN
    }
}

/// Cohen's kappa from the observed agreement and the class marginals of the
/// true and predicted labels. NaN when chance agreement is total.
pub fn cohen_kappa(observed: f64, actual_counts: &[u64], predicted_counts: &[u64]) -> f64 {
    let n: u64 = actual_counts.iter().sum();
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let chance: f64 = actual_counts
        .iter()
        .zip(predicted_counts)
        .map(|(&a, &p)| (a as f64 / n) * (p as f64 / n))
        .sum();
    let denom = 1.0 - chance;
    if denom.abs() > f64::EPSILON {
        (observed - chance) / denom
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::PerformanceEvaluatorExt;

    type Eval = ClassificationEvaluator<&'static str>;

    fn feed(ev: &mut Eval, pairs: &[(&'static str, &'static str)]) {
        for (actual, predicted) in pairs {
            ev.add_result(actual, predicted);
        }
    }

    #[test]
    fn empty_has_nan_accuracy_and_zero_kappa() {
        let ev = Eval::new();
        assert!(ev.metric("accuracy").unwrap().is_nan());
        assert_eq!(ev.metric("kappa"), Some(0.0));
        assert_eq!(ev.metric("f1"), None);
    }

    #[test]
    fn perfect_balanced_run() {
        let mut ev = Eval::new();
        feed(&mut ev, &[("Benign", "Benign"), ("Fuzzing", "Fuzzing")]);
        assert_eq!(ev.metric("accuracy"), Some(1.0));
        assert!((ev.metric("kappa").unwrap() - 1.0).abs() < 1e-12);
        assert!((ev.metric("f1").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_perfect_row_has_undefined_kappa() {
        let mut ev = Eval::new();
        feed(&mut ev, &[("Benign", "Benign")]);
        assert!(ev.metric("kappa").unwrap().is_nan());
    }

    #[test]
    fn chance_level_kappa_is_zero() {
        let mut ev = Eval::new();
        feed(&mut ev, &[("Benign", "Fuzzing"), ("Fuzzing", "Fuzzing")]);
        assert_eq!(ev.metric("accuracy"), Some(0.5));
        assert!(ev.metric("kappa").unwrap().abs() < 1e-12);
    }

    #[test]
    fn weighted_scores_follow_support() {
        // Benign: 3 rows, 2 right; Fuzzing: 1 row, right; one Benign called Fuzzing.
        let mut ev = Eval::new().per_class(true);
        feed(
            &mut ev,
            &[
                ("Benign", "Benign"),
                ("Benign", "Benign"),
                ("Benign", "Fuzzing"),
                ("Fuzzing", "Fuzzing"),
            ],
        );
        let p_benign = 1.0;
        let r_benign = 2.0 / 3.0;
        let p_fuzz = 0.5;
        let r_fuzz = 1.0;
        assert_eq!(ev.metric("precision_class_0"), Some(p_benign));
        assert_eq!(ev.metric("recall_class_1"), Some(r_fuzz));

        let precision = (3.0 * p_benign + p_fuzz) / 4.0;
        let recall = (3.0 * r_benign + r_fuzz) / 4.0;
        assert!((ev.metric("precision").unwrap() - precision).abs() < 1e-12);
        assert!((ev.metric("recall").unwrap() - recall).abs() < 1e-12);
        assert!((ev.metric("recall").unwrap() - 0.75).abs() < 1e-12);

        let f1_benign = 2.0 * p_benign * r_benign / (p_benign + r_benign);
        let f1_fuzz = 2.0 * p_fuzz * r_fuzz / (p_fuzz + r_fuzz);
        assert!((ev.metric("f1").unwrap() - (3.0 * f1_benign + f1_fuzz) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn per_class_metrics_present_only_when_enabled() {
        let mut off = Eval::new();
        feed(&mut off, &[("a", "b")]);
        assert!(off.metric("precision_class_0").is_none());

        let mut on = Eval::with_classes(["a", "b"]).per_class(true);
        feed(&mut on, &[("b", "b")]);
        for name in [
            "precision_class_0",
            "recall_class_0",
            "f1_class_0",
            "precision_class_1",
            "recall_class_1",
            "f1_class_1",
        ] {
            assert!(on.metric(name).is_some(), "{name}");
        }
        // class a never seen
        assert!(on.metric("recall_class_0").unwrap().is_nan());
        assert_eq!(on.metric("f1_class_1"), Some(1.0));
    }

    #[test]
    fn reset_keeps_class_order() {
        let mut ev = Eval::new().per_class(true);
        feed(&mut ev, &[("x", "y"), ("y", "y")]);
        ev.reset();
        assert_eq!(ev.total(), 0);
        assert_eq!(ev.classes(), &["x", "y"]);
        assert!(ev.metric("accuracy").unwrap().is_nan());
        feed(&mut ev, &[("y", "y")]);
        assert_eq!(ev.metric("accuracy"), Some(1.0));
    }

    #[test]
    fn kappa_helper() {
        assert_eq!(cohen_kappa(1.0, &[], &[]), 0.0);
        // observed 0.75, chance 0.5
        assert!((cohen_kappa(0.75, &[2, 2], &[2, 2]) - 0.5).abs() < 1e-12);
    }
}
