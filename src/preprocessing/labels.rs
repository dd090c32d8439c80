//! The five ROAD classes and the remapping of older, finer grained labels.

use crate::preprocessing::PreprocessError;
use crate::utils::atomic_file::write_atomically;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::info;

pub const LABEL_COLUMN: &str = "Label";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum RoadClass {
    Benign,
    Accelerator,
    Fuzzing,
    Fabrication,
    Masquerade,
}

impl RoadClass {
    pub fn is_attack(self) -> bool {
        self != RoadClass::Benign
    }
}

/// Class of the attack recorded in a capture file, derived from its name.
/// Names that are neither accelerator, fuzzing nor masquerade captures are
/// fabrication attacks.
pub fn attack_class_for(name: &str) -> RoadClass {
    if name.contains("accelerator") {
        RoadClass::Accelerator
    } else if name.contains("fuzzing") {
        RoadClass::Fuzzing
    } else if name.contains("masquerade") {
        RoadClass::Masquerade
    } else {
        RoadClass::Fabrication
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapSummary {
    pub rows: u64,
    pub attack_rows: u64,
}

/// Rewrites the `Label` column of one converted capture table.
///
/// Accelerator and fuzzing tables keep their labels. In every other table,
/// each non-`Benign` label is replaced by the class of the file, which folds
/// the old signal-specific labels (`CorrelatedSignal`, `MaxSpeedometer`, ...)
/// into `Fabrication` and `Masquerade`.
pub fn remap_labels<R: Read, W: Write>(
    file_name: &str,
    input: R,
    output: W,
) -> Result<RemapSummary, PreprocessError> {
    let target = match attack_class_for(file_name) {
        RoadClass::Accelerator | RoadClass::Fuzzing => None,
        class => Some(class),
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let label_index = headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or_else(|| PreprocessError::MissingColumn {
            path: PathBuf::from(file_name),
            column: LABEL_COLUMN.to_string(),
        })?;

    let mut writer = WriterBuilder::new().from_writer(output);
    writer.write_record(&headers)?;

    let benign: &str = RoadClass::Benign.into();
    let mut summary = RemapSummary::default();
    for record in reader.records() {
        let record = record?;
        summary.rows += 1;
        let label = record.get(label_index).unwrap_or_default();
        if label == benign {
            writer.write_record(&record)?;
            continue;
        }
        summary.attack_rows += 1;
        match target {
            Some(class) => {
                let replacement: &str = class.into();
                writer.write_record(record.iter().enumerate().map(|(i, field)| {
                    if i == label_index { replacement } else { field }
                }))?;
            }
            None => writer.write_record(&record)?,
        }
    }
    writer.flush()?;
    Ok(summary)
}

/// Applies [`remap_labels`] to every `.csv` file of `in_dir`, writing the
/// results under the same names in `out_dir`.
pub fn remap_directory(in_dir: &Path, out_dir: &Path) -> Result<Vec<(PathBuf, RemapSummary)>, PreprocessError> {
    fs::create_dir_all(out_dir)?;
    let mut done = Vec::new();
    for path in crate::preprocessing::csv_tools::csv_files_in(in_dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        info!(file = %name, "remapping labels");
        let input = fs::File::open(&path)?;
        let out_path = out_dir.join(&name);
        let summary = write_atomically(&out_path, |w| remap_labels(&name, input, w))?;
        info!(file = %name, rows = summary.rows, attack_rows = summary.attack_rows, "labels remapped");
        done.push((out_path, summary));
    }
    Ok(done)
}
