use crate::ensemble::{ClassLabel, FusionRule, Verdict};
use crate::evaluation::{ClassificationReport, ScoreError};
use crate::utils::atomic_file::write_atomically;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;
use strum::IntoEnumIterator;

/// How many rows each fusion rule decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleTally([u64; FusionRule::COUNT]);

impl RuleTally {
    pub fn record(&mut self, rule: FusionRule) {
        self.0[rule.index()] += 1;
    }

    pub fn count(&self, rule: FusionRule) -> u64 {
        self.0[rule.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FusionRule, u64)> + '_ {
        FusionRule::iter().map(|rule| (rule, self.count(rule)))
    }
}

impl Display for RuleTally {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(rule, n)| format!("{rule}={n}")).collect();
        f.write_str(&parts.join(" "))
    }
}

/// Aligned true and fused labels of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutput<L> {
    pub actual: Vec<L>,
    pub predicted: Vec<L>,
    pub rules: RuleTally,
}

impl<L: ClassLabel> EvaluationOutput<L> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actual: Vec::with_capacity(capacity),
            predicted: Vec::with_capacity(capacity),
            rules: RuleTally::default(),
        }
    }

    pub(crate) fn push(&mut self, actual: L, verdict: Verdict<L>) {
        self.actual.push(actual);
        self.predicted.push(verdict.label);
        self.rules.record(verdict.rule);
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }

    pub fn report(&self) -> Result<ClassificationReport<L>, ScoreError> {
        ClassificationReport::from_predictions(&self.actual, &self.predicted)
    }

    /// Writes an `actual,predicted` table, naming labels with `name`.
    pub fn write_csv<W, F>(&self, out: W, name: F) -> Result<(), csv::Error>
    where
        W: Write,
        F: Fn(&L) -> String,
    {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["actual", "predicted"])?;
        for (actual, predicted) in self.actual.iter().zip(&self.predicted) {
            writer.write_record([name(actual), name(predicted)])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<F>(&self, path: &Path, name: F) -> Result<(), csv::Error>
    where
        F: Fn(&L) -> String,
    {
        write_atomically(path, |w| self.write_csv(w, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> EvaluationOutput<&'static str> {
        let mut out = EvaluationOutput::with_capacity(3);
        out.push("Benign", Verdict { label: "Benign", rule: FusionRule::Unanimous });
        out.push("Fuzzing", Verdict { label: "Benign", rule: FusionRule::MajorityLeader });
        out.push("Fuzzing", Verdict { label: "Fuzzing", rule: FusionRule::Unanimous });
        out
    }

    #[test]
    fn tallies_rules() {
        let out = output();
        assert_eq!(out.len(), 3);
        assert_eq!(out.rules.count(FusionRule::Unanimous), 2);
        assert_eq!(out.rules.count(FusionRule::SoleLeader), 0);
        assert_eq!(out.rules.total(), 3);
        assert_eq!(
            out.rules.to_string(),
            "unanimous=2 sole-leader=0 most-confident=0 majority-leader=1"
        );
    }

    #[test]
    fn writes_label_table() {
        let mut buf = Vec::new();
        output().write_csv(&mut buf, |l| l.to_string()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "actual,predicted\nBenign,Benign\nFuzzing,Benign\nFuzzing,Fuzzing\n"
        );
    }

    #[test]
    fn saves_and_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fused.csv");
        let out = output();
        out.save_csv(&path, |l| l.to_string()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("actual,predicted\n"));

        let report = out.report().unwrap();
        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-12);
    }
}
