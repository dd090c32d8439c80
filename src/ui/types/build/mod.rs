mod error;
mod preprocessing;
mod scoring;

pub use error::BuildError;
pub use scoring::score_predictions;

use crate::preprocessing::csv_tools::{self, PadSpec};
use crate::preprocessing::{labels, road_log};
use crate::ui::types::choices::TaskChoice;
use tracing::info;

/// Runs one task to completion.
pub fn run_task(task: &TaskChoice) -> Result<(), BuildError> {
    match task {
        TaskChoice::ConvertAttackLogs(p) => {
            let done = road_log::convert_attack_directory(&p.log_dir, &p.metadata, &p.out_dir)?;
            let attacks: u64 = done.iter().map(|(_, s)| s.attack_rows).sum();
            info!(files = done.len(), attack_rows = attacks, "attack logs converted");
        }
        TaskChoice::ConvertAmbientLogs(p) => {
            let done = road_log::convert_ambient_directory(&p.log_dir, &p.metadata, &p.out_dir)?;
            info!(files = done.len(), "ambient logs converted");
        }
        TaskChoice::RemapLabels(p) => {
            let done = labels::remap_directory(&p.input_dir, &p.out_dir)?;
            info!(files = done.len(), "labels remapped");
        }
        TaskChoice::DropIncompleteRows(p) => {
            let s = csv_tools::rewrite_file(&p.input, &p.output, |r, w| {
                csv_tools::drop_incomplete_rows(r, w)
            })?;
            info!("{}", preprocessing::describe(s));
        }
        TaskChoice::ResolveFlagLabels(p) => {
            let s = csv_tools::rewrite_file(&p.input, &p.output, |r, w| {
                csv_tools::resolve_flag_labels(r, w)
            })?;
            info!("{}", preprocessing::describe(s));
        }
        TaskChoice::PadByteColumns(p) => {
            let spec = PadSpec::try_from(p)?;
            let s = csv_tools::rewrite_file(&p.files.input, &p.files.output, |r, w| {
                csv_tools::pad_byte_columns(r, w, &spec)
            })?;
            info!("{}", preprocessing::describe(s));
        }
        TaskChoice::AddColumn(p) => {
            if p.name.trim().is_empty() {
                return Err(BuildError::InvalidParameter("column name is empty".into()));
            }
            let s = csv_tools::rewrite_file(&p.files.input, &p.files.output, |r, w| {
                csv_tools::add_column(r, w, &p.name, &p.value)
            })?;
            info!("{}", preprocessing::describe(s));
        }
        TaskChoice::RemoveColumn(p) => {
            let s = csv_tools::rewrite_file(&p.files.input, &p.files.output, |r, w| {
                csv_tools::remove_column(r, w, p.column)
            })?;
            info!("{}", preprocessing::describe(s));
        }
        TaskChoice::Concatenate(p) => {
            let inputs = preprocessing::concatenation_inputs(p)?;
            let s = csv_tools::concatenate(&inputs, &p.output)?;
            info!(files = inputs.len(), "{}", preprocessing::describe(s));
        }
        TaskChoice::ScorePredictions(p) => {
            let report = score_predictions(p)?;
            info!(rows = report.total, accuracy = report.accuracy, "predictions scored");
            println!("{report}");
        }
    }
    Ok(())
}
