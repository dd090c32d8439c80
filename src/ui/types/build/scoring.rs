use crate::evaluation::ClassificationReport;
use crate::preprocessing::PreprocessError;
use crate::ui::types::build::BuildError;
use crate::ui::types::choices::ScoreParams;
use csv::ReaderBuilder;

/// Reads the true and predicted label columns of a prediction table and
/// scores them.
pub fn score_predictions(p: &ScoreParams) -> Result<ClassificationReport<String>, BuildError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(&p.predictions)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PreprocessError::MissingColumn {
                path: p.predictions.clone(),
                column: name.to_string(),
            })
    };
    let actual_at = column(&p.actual_column)?;
    let predicted_at = column(&p.predicted_column)?;

    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(a), Some(y)) = (record.get(actual_at), record.get(predicted_at)) else {
            return Err(BuildError::InvalidParameter(format!(
                "line {} has no label in one of the scored columns",
                record.position().map_or(0, |pos| pos.line())
            )));
        };
        actual.push(a.to_string());
        predicted.push(y.to_string());
    }

    Ok(ClassificationReport::from_predictions(&actual, &predicted)?)
}
