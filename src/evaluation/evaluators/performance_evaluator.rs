use crate::evaluation::Measurement;
use std::collections::HashMap;

/// Online evaluator of predictive performance.
///
/// Consumes (true label, predicted label) pairs one at a time and exposes
/// aggregated metrics via [`PerformanceEvaluator::performance`].
pub trait PerformanceEvaluator {
    type Label;

    /// Clears all accumulated results.
    fn reset(&mut self);

    fn add_result(&mut self, actual: &Self::Label, predicted: &Self::Label);

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Returns (name, Some(value)|None) for each requested metric, preserving order.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let map: HashMap<_, _> = self
            .performance()
            .into_iter()
            .map(|m| (m.name, m.value))
            .collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
