/// Feature values of one record, in column order.
///
/// Rows are owned by the caller and only ever borrowed by learners and the
/// fusion step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn new(values: Vec<f64>) -> FeatureRow {
        FeatureRow { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for FeatureRow {
    fn from(values: Vec<f64>) -> Self {
        FeatureRow::new(values)
    }
}

impl FromIterator<f64> for FeatureRow {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        FeatureRow::new(iter.into_iter().collect())
    }
}
