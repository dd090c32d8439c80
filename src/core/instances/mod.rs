mod feature_row;
mod labeled_instance;

pub use feature_row::FeatureRow;
pub use labeled_instance::LabeledInstance;
