use crate::core::instances::FeatureRow;

/// A feature row together with its true class index.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledInstance {
    pub row: FeatureRow,
    pub class: usize,
}

impl LabeledInstance {
    pub fn new(row: FeatureRow, class: usize) -> LabeledInstance {
        LabeledInstance { row, class }
    }

    pub fn into_pair(self) -> (FeatureRow, usize) {
        (self.row, self.class)
    }
}
