//! Row-level clean-up of comma separated tables.
//!
//! Every utility streams records from a reader to a writer without treating
//! the first line specially unless it says so. [`rewrite_file`] runs one of
//! them file to file; the output may be the input itself.

use crate::preprocessing::PreprocessError;
use crate::preprocessing::labels::RoadClass;
use crate::utils::atomic_file::write_atomically;
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSummary {
    pub rows_read: u64,
    pub rows_written: u64,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

fn writer<W: Write>(output: W) -> Writer<W> {
    WriterBuilder::new().flexible(true).from_writer(output)
}

/// Streams every record through `map`; `None` drops the record.
fn transform<R, W, F>(input: R, output: W, mut map: F) -> Result<RowSummary, PreprocessError>
where
    R: Read,
    W: Write,
    F: FnMut(usize, StringRecord) -> Option<StringRecord>,
{
    let mut reader = reader(input);
    let mut writer = writer(output);
    let mut summary = RowSummary::default();
    for (index, record) in reader.records().enumerate() {
        summary.rows_read += 1;
        if let Some(out) = map(index, record?) {
            writer.write_record(&out)?;
            summary.rows_written += 1;
        }
    }
    writer.flush()?;
    Ok(summary)
}

/// Reads `input`, applies `tool` and atomically writes the result to `output`.
pub fn rewrite_file<F>(input: &Path, output: &Path, tool: F) -> Result<RowSummary, PreprocessError>
where
    F: FnOnce(BufReader<File>, &mut dyn Write) -> Result<RowSummary, PreprocessError>,
{
    let source = BufReader::new(File::open(input)?);
    let summary = write_atomically(output, |w| tool(source, w))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        read = summary.rows_read,
        written = summary.rows_written,
        "rewrote table"
    );
    Ok(summary)
}

/// Drops every row with an empty or whitespace-only field.
pub fn drop_incomplete_rows<R: Read, W: Write>(input: R, output: W) -> Result<RowSummary, PreprocessError> {
    transform(input, output, |_, record| {
        record
            .iter()
            .all(|field| !field.trim().is_empty())
            .then_some(record)
    })
}

/// Appends a column: `name` on the header row, `value` everywhere else.
pub fn add_column<R: Read, W: Write>(
    input: R,
    output: W,
    name: &str,
    value: &str,
) -> Result<RowSummary, PreprocessError> {
    transform(input, output, |index, mut record| {
        record.push_field(if index == 0 { name } else { value });
        Some(record)
    })
}

/// Removes the field at `column` from every row that has one.
pub fn remove_column<R: Read, W: Write>(
    input: R,
    output: W,
    column: usize,
) -> Result<RowSummary, PreprocessError> {
    transform(input, output, |_, record| {
        Some(
            record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != column)
                .map(|(_, field)| field)
                .collect(),
        )
    })
}

/// How [`pad_byte_columns`] repairs rows with missing payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadSpec {
    /// Byte columns; short rows are extended to cover them.
    pub columns: Range<usize>,
    /// Flag values that leaked into byte columns of short rows.
    pub markers: Vec<String>,
    /// Column the row's flag is moved to, if any.
    pub flag_column: Option<usize>,
}

impl PadSpec {
    pub const FILLER: &'static str = "00";

    /// Car-hacking layout: bytes in columns 2..9, `R`/`T` flag moved to 10.
    pub fn car_hacking() -> PadSpec {
        PadSpec {
            columns: 2..9,
            markers: vec!["R".to_string(), "T".to_string()],
            flag_column: Some(10),
        }
    }

    fn is_marker(&self, field: &str) -> bool {
        self.markers.iter().any(|m| m == field)
    }
}

/// Fills byte columns that are empty or hold a flag marker with `00`, moving
/// the row's flag to its proper column first.
pub fn pad_byte_columns<R: Read, W: Write>(
    input: R,
    output: W,
    spec: &PadSpec,
) -> Result<RowSummary, PreprocessError> {
    transform(input, output, |_, record| {
        let flag = spec
            .markers
            .iter()
            .find(|m| record.iter().any(|f| f == m.as_str()))
            .cloned();
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

        let mut width = spec.columns.end;
        if let Some(column) = spec.flag_column.filter(|_| flag.is_some()) {
            width = width.max(column + 1);
        }
        if fields.len() < width {
            fields.resize(width, String::new());
        }
        for field in &mut fields[spec.columns.clone()] {
            if field.trim().is_empty() || spec.is_marker(field) {
                *field = PadSpec::FILLER.to_string();
            }
        }
        if let (Some(column), Some(flag)) = (spec.flag_column, flag) {
            fields[column] = flag;
        }
        Some(fields.into_iter().collect())
    })
}

pub const REAL_FLAG: &str = "R";
pub const INJECTED_FLAG: &str = "T";

/// Replaces the trailing `flag,name` pair: `R` rows end in `Benign`, `T` rows
/// end in the attack name. Rows without a flag are copied unchanged.
pub fn resolve_flag_labels<R: Read, W: Write>(input: R, output: W) -> Result<RowSummary, PreprocessError> {
    let benign: &str = RoadClass::Benign.into();
    transform(input, output, |_, record| {
        let n = record.len();
        if n < 2 {
            return Some(record);
        }
        let label = match &record[n - 2] {
            REAL_FLAG => benign,
            INJECTED_FLAG => &record[n - 1],
            _ => return Some(record),
        };
        let mut out: StringRecord = record.iter().take(n - 2).collect();
        out.push_field(label);
        Some(out)
    })
}

/// Appends `inputs` into `output`, writing the header of the first input
/// once. Every input must have the same header.
pub fn concatenate(inputs: &[PathBuf], output: &Path) -> Result<RowSummary, PreprocessError> {
    let Some(first) = inputs.first() else {
        return Err(PreprocessError::NoInputs);
    };
    let expected = read_header(first)?;
    for path in &inputs[1..] {
        let found = read_header(path)?;
        if found != expected {
            return Err(PreprocessError::SchemaMismatch {
                path: path.clone(),
                expected,
                found,
            });
        }
    }

    write_atomically(output, |w| {
        let mut out = writer(w);
        out.write_record(&expected)?;
        let mut summary = RowSummary::default();
        for path in inputs {
            let mut reader = ReaderBuilder::new()
                .flexible(true)
                .from_reader(BufReader::new(File::open(path)?));
            let before = summary.rows_written;
            for record in reader.records() {
                out.write_record(&record?)?;
                summary.rows_read += 1;
                summary.rows_written += 1;
            }
            debug!(file = %path.display(), rows = summary.rows_written - before, "appended");
        }
        out.flush()?;
        Ok(summary)
    })
}

fn read_header(path: &Path) -> Result<Vec<String>, PreprocessError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(File::open(path)?));
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

/// The `.csv` files directly inside `dir`, sorted by path.
pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
