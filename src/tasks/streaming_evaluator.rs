use crate::core::instances::{FeatureRow, LabeledInstance};
use crate::ensemble::{
    ClassLabel, FusionError, LeaderTable, LearnerHandle, PredictionRecord, Verdict, fuse_with_rule,
};
use crate::evaluation::{ClassificationEvaluator, PerformanceEvaluator, PerformanceEvaluatorExt};
use crate::streams::Stream;
use crate::tasks::{EvaluationOutput, Progress, RunError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::error::Error;
use std::iter::Peekable;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Rows between two progress reports.
    pub progress_frequency: u64,
    /// Stop after this many rows.
    pub max_rows: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            progress_frequency: 1000,
            max_rows: None,
        }
    }
}

type ProgressHook = Box<dyn FnMut(&Progress)>;

/// Runs every learner on every row, fuses their opinions and scores the fused
/// label against the true one.
///
/// Rows are consumed once, in order. Per row only the freshly built
/// [`PredictionRecord`]s are held; the outputs grow by one entry per row.
pub struct StreamingEvaluator<L: ClassLabel> {
    learners: Vec<LearnerHandle<L>>,
    leaders: Arc<LeaderTable<L>>,
    config: EvaluatorConfig,
    evaluator: Box<dyn PerformanceEvaluator<Label = L>>,
    progress: Option<ProgressHook>,
}

impl<L: ClassLabel> StreamingEvaluator<L> {
    pub fn new(
        learners: Vec<LearnerHandle<L>>,
        leaders: impl Into<Arc<LeaderTable<L>>>,
        config: EvaluatorConfig,
    ) -> Result<Self, RunError> {
        if learners.is_empty() {
            return Err(RunError::InvalidConfig(
                "at least one learner is required".into(),
            ));
        }
        if config.progress_frequency == 0 {
            return Err(RunError::InvalidConfig(
                "progress_frequency must be > 0".into(),
            ));
        }

        Ok(Self {
            learners,
            leaders: leaders.into(),
            config,
            evaluator: Box::new(ClassificationEvaluator::<L>::new()),
            progress: None,
        })
    }

    pub fn with_progress<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Progress) + 'static,
    {
        self.progress = Some(Box::new(hook));
        self
    }

    /// Sends every progress report over `tx`; a closed channel is ignored.
    pub fn with_progress_channel(self, tx: Sender<Progress>) -> Self {
        self.with_progress(move |p| {
            let _ = tx.send(p.clone());
        })
    }

    /// Replaces the online evaluator behind the progress reports.
    pub fn with_evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: PerformanceEvaluator<Label = L> + 'static,
    {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn learners(&self) -> &[LearnerHandle<L>] {
        &self.learners
    }

    pub fn leaders(&self) -> &LeaderTable<L> {
        &self.leaders
    }

    pub fn evaluator(&self) -> &dyn PerformanceEvaluator<Label = L> {
        self.evaluator.as_ref()
    }

    /// Fuses a single row.
    pub fn fuse_row(&self, row: &FeatureRow) -> Result<Verdict<L>, FusionError> {
        fuse_row(&self.learners, &self.leaders, row)
    }

    pub fn run<I>(&mut self, rows: I) -> Result<EvaluationOutput<L>, RunError>
    where
        I: IntoIterator<Item = (FeatureRow, L)>,
    {
        self.try_run(rows.into_iter().map(Ok::<_, Infallible>))
    }

    /// Like [`run`](Self::run) over fallible input; the first input error
    /// stops the run.
    pub fn try_run<I, E>(&mut self, rows: I) -> Result<EvaluationOutput<L>, RunError>
    where
        I: IntoIterator<Item = Result<(FeatureRow, L), E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let started = Instant::now();
        self.evaluator.reset();
        info!(
            learners = self.learners.len(),
            leaders = self.leaders.len(),
            "starting fused evaluation"
        );

        let mut rows = rows.into_iter().peekable();
        let mut output = EvaluationOutput::with_capacity(rows.size_hint().0);
        loop {
            if self
                .config
                .max_rows
                .is_some_and(|max| output.len() as u64 >= max)
            {
                break;
            }
            let Some(item) = rows.next() else {
                break;
            };
            let row_number = output.len() as u64 + 1;

            let (row, actual) = item.map_err(|e| RunError::Input {
                row: row_number,
                source: e.into(),
            })?;
            let verdict = self
                .fuse_row(&row)
                .map_err(|source| RunError::Fusion {
                    row: row_number,
                    source,
                })?;

            self.evaluator.add_result(&actual, &verdict.label);
            output.push(actual, verdict);

            // a boundary on the last row is covered by the final report
            if row_number % self.config.progress_frequency == 0 && !self.is_last(row_number, &mut rows) {
                self.report(started, row_number, false);
            }
        }

        self.report(started, output.len() as u64, true);
        debug!(rules = %output.rules, "fusion rules used");
        info!(
            rows = output.len(),
            seconds = started.elapsed().as_secs_f64(),
            "fused evaluation finished"
        );
        Ok(output)
    }

    /// Fuses a materialised slice of rows on the rayon pool. Output order is
    /// input order; the lowest failing row aborts the run, and rows after a
    /// known failure are skipped. No progress is reported.
    pub fn run_parallel(&mut self, rows: &[(FeatureRow, L)]) -> Result<EvaluationOutput<L>, RunError> {
        let limit = self
            .config
            .max_rows
            .map_or(rows.len(), |max| rows.len().min(usize::try_from(max).unwrap_or(usize::MAX)));
        let rows = &rows[..limit];
        info!(rows = rows.len(), learners = self.learners.len(), "starting parallel fused evaluation");

        let learners = self.learners.as_slice();
        let leaders = self.leaders.as_ref();
        // lowest failed index so far; rows above it are not fused
        let first_failure = AtomicUsize::new(usize::MAX);
        let mut verdicts: Vec<Option<Result<Verdict<L>, FusionError>>> = rows
            .par_iter()
            .enumerate()
            .map(|(i, (row, _))| {
                if i > first_failure.load(Ordering::Relaxed) {
                    return None;
                }
                let verdict = fuse_row(learners, leaders, row);
                if verdict.is_err() {
                    first_failure.fetch_min(i, Ordering::Relaxed);
                }
                Some(verdict)
            })
            .collect();

        let failed = first_failure.into_inner();
        if let Some(Some(Err(source))) = verdicts.get_mut(failed).map(Option::take) {
            return Err(RunError::Fusion {
                row: failed as u64 + 1,
                source,
            });
        }

        self.evaluator.reset();
        let mut output = EvaluationOutput::with_capacity(rows.len());
        for (i, ((_, actual), verdict)) in rows.iter().zip(verdicts.into_iter().flatten()).enumerate() {
            let verdict = verdict.map_err(|source| RunError::Fusion {
                row: i as u64 + 1,
                source,
            })?;
            self.evaluator.add_result(actual, &verdict.label);
            output.push(actual.clone(), verdict);
        }
        debug!(rules = %output.rules, "fusion rules used");
        Ok(output)
    }

    /// Whether `row_number` ends the run, either by `max_rows` or because
    /// the input is exhausted.
    fn is_last<I: Iterator>(&self, row_number: u64, rows: &mut Peekable<I>) -> bool {
        self.config.max_rows.is_some_and(|max| row_number >= max) || rows.peek().is_none()
    }

    fn report(&mut self, started: Instant, rows_seen: u64, finished: bool) {
        let progress = Progress {
            rows_seen,
            seconds: started.elapsed().as_secs_f64(),
            accuracy: self.evaluator.metric("accuracy").unwrap_or(f64::NAN),
            kappa: self.evaluator.metric("kappa").unwrap_or(f64::NAN),
            finished,
        };
        debug!(%progress, "progress");
        if let Some(hook) = self.progress.as_mut() {
            hook(&progress);
        }
    }
}

impl StreamingEvaluator<usize> {
    /// Runs over a dataset stream whose class indices are the labels.
    pub fn run_stream(&mut self, stream: &mut dyn Stream) -> Result<EvaluationOutput<usize>, RunError> {
        let rows = std::iter::from_fn(|| stream.next_instance())
            .map(|item| item.map(LabeledInstance::into_pair));
        self.try_run(rows)
    }
}

/// Collects every learner's record for `row` and fuses them.
pub fn fuse_row<L: ClassLabel>(
    learners: &[LearnerHandle<L>],
    leaders: &LeaderTable<L>,
    row: &FeatureRow,
) -> Result<Verdict<L>, FusionError> {
    let records = learners
        .iter()
        .map(|learner| PredictionRecord::collect(learner, row))
        .collect::<Result<Vec<_>, _>>()?;
    fuse_with_rule(&records, leaders, row)
}
