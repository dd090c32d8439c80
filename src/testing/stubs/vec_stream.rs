use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{FeatureRow, LabeledInstance};
use crate::streams::{Stream, StreamError};
use crate::testing::dummies::header_with_classes;
use std::sync::Arc;

/// In-memory stream whose single feature equals the class index.
pub struct VecStream {
    pub header: Arc<InstanceHeader>,
    pub labels: Vec<usize>,
    idx: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        let classes = labels.iter().copied().max().map_or(0, |m| m + 1);
        let names: Vec<String> = (0..classes).map(|c| format!("c{c}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        Self {
            header: header_with_classes(&names),
            labels,
            idx: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<Result<LabeledInstance, StreamError>> {
        if !self.has_more_instances() {
            return None;
        }

        let y = self.labels[self.idx];
        self.idx += 1;
        Some(Ok(LabeledInstance::new(FeatureRow::new(vec![y as f64]), y)))
    }

    fn restart(&mut self) -> Result<(), StreamError> {
        self.idx = 0;
        Ok(())
    }
}
