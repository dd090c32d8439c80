//! Conversion of raw ROAD capture logs into labeled `Time,Id,Byte1..Byte8,Label`
//! tables.

use crate::core::InstanceHeader;
use crate::core::attributes::{AttributeRef, HexAttribute, NominalAttribute, NumericAttribute};
use crate::preprocessing::PreprocessError;
use crate::preprocessing::capture::{
    CanCapture, HexPattern, hex_matches, normalize_injection_id, within_interval,
};
use crate::preprocessing::labels::{LABEL_COLUMN, RoadClass, attack_class_for};
use crate::utils::atomic_file::write_atomically;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, warn};

pub const PAYLOAD_BYTES: usize = 8;

pub const ROAD_COLUMNS: [&str; 11] = [
    "Time", "Id", "Byte1", "Byte2", "Byte3", "Byte4", "Byte5", "Byte6", "Byte7", "Byte8",
    LABEL_COLUMN,
];

const PROGRESS_LINES: u64 = 10_000;

/// Schema of a converted capture table; the label column holds the five
/// [`RoadClass`] names.
pub fn road_header() -> Arc<InstanceHeader> {
    let mut attributes: Vec<AttributeRef> = Vec::with_capacity(ROAD_COLUMNS.len());
    attributes.push(Arc::new(NumericAttribute::new(ROAD_COLUMNS[0].to_string())));
    for name in &ROAD_COLUMNS[1..10] {
        attributes.push(Arc::new(HexAttribute::new(name.to_string())));
    }
    let classes = RoadClass::iter().map(|c| c.to_string());
    attributes.push(Arc::new(NominalAttribute::with_values(
        LABEL_COLUMN.to_string(),
        classes,
    )));
    Arc::new(InstanceHeader::new("road".to_string(), attributes, 10))
}

/// One entry of `capture_metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureMetadata {
    pub injection_id: Option<String>,
    pub injection_data_str: Option<String>,
    /// Seconds relative to the first capture of the log.
    pub injection_interval: Option<(f64, f64)>,
}

pub fn load_metadata(path: &Path) -> Result<BTreeMap<String, CaptureMetadata>, PreprocessError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// What a capture must look like to be labeled as the attack.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionSpec {
    pub id: Option<HexPattern>,
    pub payload: Option<HexPattern>,
    pub interval: Option<(f64, f64)>,
}

impl InjectionSpec {
    pub fn from_metadata(meta: &CaptureMetadata) -> InjectionSpec {
        InjectionSpec {
            id: normalize_injection_id(meta.injection_id.as_deref()).map(|id| HexPattern::new(&id)),
            payload: meta.injection_data_str.as_deref().map(HexPattern::new),
            interval: meta.injection_interval,
        }
    }

    /// The interval moved onto the absolute clock of a log whose first
    /// capture was taken at `offset`.
    fn anchored(&self, offset: f64) -> InjectionSpec {
        InjectionSpec {
            interval: self.interval.map(|(start, end)| (start + offset, end + offset)),
            ..self.clone()
        }
    }

    pub fn matches(&self, capture: &CanCapture) -> bool {
        hex_matches(&capture.id, self.id.as_ref())
            && hex_matches(&capture.payload, self.payload.as_ref())
            && within_interval(capture.timestamp, self.interval)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows: u64,
    pub attack_rows: u64,
}

/// Converts an attack log. A capture gets `class` only when its id, payload
/// and timestamp all match the injection; every other capture is `Benign`.
pub fn convert_attack_log<R: BufRead, W: Write>(
    input: R,
    output: W,
    meta: &CaptureMetadata,
    class: RoadClass,
) -> Result<ConversionSummary, PreprocessError> {
    let injection = InjectionSpec::from_metadata(meta);
    let mut anchored: Option<InjectionSpec> = None;
    write_table(input, output, |capture| {
        let spec = anchored.get_or_insert_with(|| injection.anchored(capture.timestamp));
        if spec.matches(capture) {
            class
        } else {
            RoadClass::Benign
        }
    })
}

/// Converts an ambient log; every capture is `Benign`.
pub fn convert_ambient_log<R: BufRead, W: Write>(
    input: R,
    output: W,
) -> Result<ConversionSummary, PreprocessError> {
    write_table(input, output, |_| RoadClass::Benign)
}

fn write_table<R, W, F>(input: R, output: W, mut label: F) -> Result<ConversionSummary, PreprocessError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&CanCapture) -> RoadClass,
{
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(ROAD_COLUMNS)?;

    let mut summary = ConversionSummary::default();
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let capture = CanCapture::parse(&line).map_err(|source| PreprocessError::Capture {
            line: number as u64 + 1,
            source,
        })?;
        let class = label(&capture);

        let mut row = Vec::with_capacity(ROAD_COLUMNS.len());
        row.push(format!("{:.6}", capture.timestamp));
        row.push(capture.id.clone());
        row.extend(capture.payload_bytes(PAYLOAD_BYTES));
        row.push(class.to_string());
        writer.write_record(&row)?;

        summary.rows += 1;
        if class.is_attack() {
            summary.attack_rows += 1;
        }
        if summary.rows % PROGRESS_LINES == 0 {
            info!(
                lines = summary.rows,
                at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
                "converting"
            );
        }
    }
    writer.flush()?;
    Ok(summary)
}

/// Converts `<log_dir>/<name>.log` to `<out_dir>/<name>.csv` for every entry
/// of the metadata file. Outputs that already exist are skipped.
pub fn convert_attack_directory(
    log_dir: &Path,
    metadata_path: &Path,
    out_dir: &Path,
) -> Result<Vec<(PathBuf, ConversionSummary)>, PreprocessError> {
    convert_directory(log_dir, metadata_path, out_dir, |name, input, output, meta| {
        convert_attack_log(input, output, meta, attack_class_for(name))
    })
}

pub fn convert_ambient_directory(
    log_dir: &Path,
    metadata_path: &Path,
    out_dir: &Path,
) -> Result<Vec<(PathBuf, ConversionSummary)>, PreprocessError> {
    convert_directory(log_dir, metadata_path, out_dir, |_, input, output, _| {
        convert_ambient_log(input, output)
    })
}

fn convert_directory<F>(
    log_dir: &Path,
    metadata_path: &Path,
    out_dir: &Path,
    mut convert: F,
) -> Result<Vec<(PathBuf, ConversionSummary)>, PreprocessError>
where
    F: FnMut(&str, BufReader<File>, &mut dyn Write, &CaptureMetadata) -> Result<ConversionSummary, PreprocessError>,
{
    let metadata = load_metadata(metadata_path)?;
    fs::create_dir_all(out_dir)?;

    let mut done = Vec::new();
    for (name, meta) in &metadata {
        let out_path = out_dir.join(format!("{name}.csv"));
        if out_path.exists() {
            warn!(file = %out_path.display(), "output exists, skipping");
            continue;
        }
        let log_path = log_dir.join(format!("{name}.log"));
        info!(file = %log_path.display(), "converting capture log");
        let input = BufReader::new(File::open(&log_path)?);
        let summary = write_atomically(&out_path, |w| convert(name, input, w, meta))?;
        info!(
            file = %out_path.display(),
            rows = summary.rows,
            attack_rows = summary.attack_rows,
            "converted"
        );
        done.push((out_path, summary));
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
(1030000000.000000) can0 354#200A000000027480
(1030000001.500000) can0 0D0#FFFF000000000000
(1030000002.250000) can0 0D0#FFFF000000000001
(1030000004.000000) can0 0D0#FFFF000000000000
";

    fn meta(id: Option<&str>, data: Option<&str>, interval: Option<(f64, f64)>) -> CaptureMetadata {
        CaptureMetadata {
            injection_id: id.map(str::to_string),
            injection_data_str: data.map(str::to_string),
            injection_interval: interval,
        }
    }

    fn convert(meta: &CaptureMetadata, class: RoadClass) -> (Vec<String>, ConversionSummary) {
        let mut out = Vec::new();
        let summary = convert_attack_log(LOG.as_bytes(), &mut out, meta, class).unwrap();
        let text = String::from_utf8(out).unwrap();
        (text.lines().map(str::to_string).collect(), summary)
    }

    #[test]
    fn header_matches_columns() {
        let header = road_header();
        assert_eq!(header.column_names(), ROAD_COLUMNS.to_vec());
        assert_eq!(header.number_of_classes(), 5);
        assert_eq!(header.class_name(0), Some("Benign"));
    }

    #[test]
    fn all_three_conditions_must_match() {
        let m = meta(Some("0xd0"), Some("ffffxxxxxxxxxx00"), Some((1.0, 3.0)));
        let (lines, summary) = convert(&m, RoadClass::Fabrication);

        assert_eq!(lines[0], ROAD_COLUMNS.join(","));
        assert_eq!(lines[1], "1030000000.000000,354,20,0A,00,00,00,02,74,80,Benign");
        assert_eq!(lines[2], "1030000001.500000,0D0,FF,FF,00,00,00,00,00,00,Fabrication");
        // payload mismatch
        assert!(lines[3].ends_with(",01,Benign"));
        // outside the window
        assert!(lines[4].ends_with(",Benign"));
        assert_eq!(summary, ConversionSummary { rows: 4, attack_rows: 1 });
    }

    #[test]
    fn absent_fields_match_everything() {
        let (lines, summary) = convert(&CaptureMetadata::default(), RoadClass::Fuzzing);
        assert!(lines[1..].iter().all(|l| l.ends_with(",Fuzzing")));
        assert_eq!(summary.attack_rows, 4);
    }

    #[test]
    fn ambient_logs_are_benign() {
        let mut out = Vec::new();
        let summary = convert_ambient_log(LOG.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(summary, ConversionSummary { rows: 4, attack_rows: 0 });
        assert!(text.lines().skip(1).all(|l| l.ends_with(",Benign")));
    }

    #[test]
    fn short_payloads_leave_empty_bytes() {
        let mut out = Vec::new();
        convert_ambient_log("(5.0) can0 6E0#0102\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("5.000000,6E0,01,02,,,,,,,Benign"));
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let mut out = Vec::new();
        let err = convert_ambient_log("(1.0) can0 354#00\ngarbage\n".as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, PreprocessError::Capture { line: 2, .. }));
    }

    #[test]
    fn metadata_parses_nulls_and_missing_fields() {
        let json = r#"{
            "fuzzing_attack_1": {"injection_id": "XXX", "injection_data_str": null, "injection_interval": [1.5, 3.0]},
            "max_speedometer_attack_1": {"injection_id": "0xd0"}
        }"#;
        let parsed: BTreeMap<String, CaptureMetadata> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed["fuzzing_attack_1"].injection_interval, Some((1.5, 3.0)));
        assert_eq!(parsed["max_speedometer_attack_1"].injection_data_str, None);
        assert_eq!(parsed["max_speedometer_attack_1"].injection_interval, None);
    }

    #[test]
    fn directory_conversion_skips_finished_outputs() {
        let logs = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(logs.path().join("fuzzing_attack_1.log"), LOG).unwrap();
        fs::write(logs.path().join("masquerade_attack_1.log"), LOG).unwrap();
        let meta_path = logs.path().join("capture_metadata.json");
        fs::write(
            &meta_path,
            r#"{"fuzzing_attack_1": {"injection_id": "XXX"}, "masquerade_attack_1": {"injection_id": "0x354"}}"#,
        )
        .unwrap();
        fs::write(out.path().join("masquerade_attack_1.csv"), "done").unwrap();

        let done = convert_attack_directory(logs.path(), &meta_path, out.path()).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].1.attack_rows, 4);
        let written = fs::read_to_string(out.path().join("fuzzing_attack_1.csv")).unwrap();
        assert!(written.lines().nth(1).unwrap().ends_with(",Fuzzing"));
        assert_eq!(
            fs::read_to_string(out.path().join("masquerade_attack_1.csv")).unwrap(),
            "done"
        );
    }
}
