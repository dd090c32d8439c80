use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{FeatureRow, LabeledInstance};
use crate::streams::{Stream, StreamError};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads a headed CSV table (e.g. the converted ROAD captures) as labeled
/// instances. The file's header row must list exactly the header's attribute
/// names in order.
pub struct CsvFileStream {
    path: PathBuf,
    header: Arc<InstanceHeader>,
    reader: Reader<File>,
    record: StringRecord,
    exhausted: bool,
}

impl CsvFileStream {
    pub fn new<P: AsRef<Path>>(path: P, header: Arc<InstanceHeader>) -> Result<Self, StreamError> {
        if header.class_attribute().is_none() {
            return Err(StreamError::ClassNotNominal {
                relation: header.relation_name().to_string(),
            });
        }
        let path = path.as_ref().to_path_buf();
        let reader = Self::open(&path, &header)?;
        Ok(Self {
            path,
            header,
            reader,
            record: StringRecord::new(),
            exhausted: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path, header: &InstanceHeader) -> Result<Reader<File>, StreamError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| StreamError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let expected: Vec<String> = header
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if found != expected {
            return Err(StreamError::HeaderMismatch { expected, found });
        }
        Ok(reader)
    }

    fn parse_record(&self) -> Result<LabeledInstance, StreamError> {
        let line = self.record.position().map_or(0, |p| p.line());
        let expected = self.header.number_of_attributes();
        if self.record.len() != expected {
            return Err(StreamError::FieldCount {
                line,
                expected,
                found: self.record.len(),
            });
        }

        let class_index = self.header.class_index();
        let mut features = Vec::with_capacity(self.header.number_of_features());
        let mut class = 0usize;
        for (i, (attribute, raw)) in self.header.attributes.iter().zip(self.record.iter()).enumerate() {
            let value = attribute
                .parse_value(raw)
                .map_err(|source| StreamError::Value { line, source })?;
            if i == class_index {
                class = value as usize;
            } else {
                features.push(value);
            }
        }
        Ok(LabeledInstance::new(FeatureRow::new(features), class))
    }
}

impl Stream for CsvFileStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        !self.exhausted
    }

    fn next_instance(&mut self) -> Option<Result<LabeledInstance, StreamError>> {
        if self.exhausted {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(self.parse_record()),
            Ok(false) => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e.into()))
            }
        }
    }

    fn restart(&mut self) -> Result<(), StreamError> {
        self.reader = Self::open(&self.path, &self.header)?;
        self.exhausted = false;
        Ok(())
    }
}
