use crate::preprocessing::csv_tools::{self, PadSpec, RowSummary};
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::{ConcatenateParams, PadParams};
use std::path::PathBuf;

impl TryFrom<&PadParams> for PadSpec {
    type Error = BuildError;

    fn try_from(p: &PadParams) -> Result<Self, Self::Error> {
        if p.first_byte_column > p.last_byte_column {
            return Err(BuildError::InvalidParameter(format!(
                "first byte column {} is after last byte column {}",
                p.first_byte_column, p.last_byte_column
            )));
        }
        if p.flag_column.is_some_and(|c| (p.first_byte_column..=p.last_byte_column).contains(&c)) {
            return Err(BuildError::InvalidParameter(
                "flag column lies inside the byte columns".into(),
            ));
        }
        Ok(PadSpec {
            columns: p.first_byte_column..p.last_byte_column + 1,
            markers: p.markers.clone(),
            flag_column: p.flag_column,
        })
    }
}

/// Expands directories to the `.csv` files they hold, keeping the given order.
pub(super) fn concatenation_inputs(p: &ConcatenateParams) -> Result<Vec<PathBuf>, BuildError> {
    let mut inputs = Vec::new();
    for path in &p.inputs {
        if path.is_dir() {
            inputs.extend(csv_tools::csv_files_in(path)?);
        } else {
            inputs.push(path.clone());
        }
    }
    if let Some(clash) = inputs.iter().find(|i| **i == p.output) {
        return Err(BuildError::InvalidParameter(format!(
            "output {} is also an input",
            clash.display()
        )));
    }
    Ok(inputs)
}

pub(super) fn describe(summary: RowSummary) -> String {
    format!("{} of {} rows written", summary.rows_written, summary.rows_read)
}
