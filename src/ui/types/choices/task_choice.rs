use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConvertLogsParams {
    #[schemars(
        with = "String",
        title = "Log Directory",
        description = "Directory holding the <name>.log captures",
        extend("format" = "path", "x-dir" = true, "x-must-exist" = true)
    )]
    pub log_dir: PathBuf,

    #[schemars(
        with = "String",
        title = "Capture Metadata",
        description = "capture_metadata.json describing each capture",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["json"]
        )
    )]
    pub metadata: PathBuf,

    #[schemars(
        with = "String",
        title = "Output Directory",
        description = "Converted <name>.csv tables go here; existing ones are skipped",
        extend("format" = "path")
    )]
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RemapParams {
    #[schemars(
        with = "String",
        title = "Input Directory",
        description = "Directory of converted attack tables",
        extend("format" = "path", "x-dir" = true, "x-must-exist" = true)
    )]
    pub input_dir: PathBuf,

    #[schemars(
        with = "String",
        title = "Output Directory",
        extend("format" = "path")
    )]
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RewriteParams {
    #[schemars(
        with = "String",
        title = "Input CSV",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["csv"]
        )
    )]
    pub input: PathBuf,

    #[schemars(
        with = "String",
        title = "Output CSV",
        description = "May be the input file itself",
        extend("format" = "path", "x-extensions" = ["csv"])
    )]
    pub output: PathBuf,
}

fn default_first_byte_column() -> usize {
    2
}

fn default_last_byte_column() -> usize {
    8
}

fn default_markers() -> Vec<String> {
    vec!["R".into(), "T".into()]
}

fn default_flag_column() -> Option<usize> {
    Some(10)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PadParams {
    #[serde(flatten)]
    pub files: RewriteParams,

    #[serde(default = "default_first_byte_column")]
    #[schemars(
        title = "First Byte Column",
        description = "Zero-based index of the first payload byte column",
        range(min = 0)
    )]
    pub first_byte_column: usize,

    #[serde(default = "default_last_byte_column")]
    #[schemars(
        title = "Last Byte Column",
        description = "Zero-based index of the last payload byte column (inclusive)",
        range(min = 0)
    )]
    pub last_byte_column: usize,

    #[serde(default = "default_markers")]
    #[schemars(
        title = "Markers",
        description = "Flag values that count as missing bytes, comma separated"
    )]
    pub markers: Vec<String>,

    #[serde(default = "default_flag_column")]
    #[schemars(
        title = "Flag Column",
        description = "Column the row flag is moved to (None = leave it)"
    )]
    pub flag_column: Option<usize>,
}

impl Default for PadParams {
    fn default() -> Self {
        Self {
            files: RewriteParams::default(),
            first_byte_column: default_first_byte_column(),
            last_byte_column: default_last_byte_column(),
            markers: default_markers(),
            flag_column: default_flag_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AddColumnParams {
    #[serde(flatten)]
    pub files: RewriteParams,

    #[schemars(title = "Column Name", length(min = 1))]
    pub name: String,

    #[schemars(title = "Value", description = "Written on every data row")]
    pub value: String,
}

fn default_removed_column() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RemoveColumnParams {
    #[serde(flatten)]
    pub files: RewriteParams,

    #[serde(default = "default_removed_column")]
    #[schemars(
        title = "Column",
        description = "Zero-based index of the column to drop",
        range(min = 0)
    )]
    pub column: usize,
}

impl Default for RemoveColumnParams {
    fn default() -> Self {
        Self {
            files: RewriteParams::default(),
            column: default_removed_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConcatenateParams {
    #[schemars(
        with = "Vec<String>",
        title = "Inputs",
        description = "Tables sharing one header, comma separated; a directory stands for its .csv files",
        extend("format" = "path", "x-must-exist" = true)
    )]
    pub inputs: Vec<PathBuf>,

    #[schemars(
        with = "String",
        title = "Output CSV",
        extend("format" = "path", "x-extensions" = ["csv"])
    )]
    pub output: PathBuf,
}

fn default_actual_column() -> String {
    "actual".into()
}

fn default_predicted_column() -> String {
    "predicted".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreParams {
    #[schemars(
        with = "String",
        title = "Predictions CSV",
        description = "Table with a true-label and a predicted-label column",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["csv"]
        )
    )]
    pub predictions: PathBuf,

    #[serde(default = "default_actual_column")]
    #[schemars(title = "True Label Column")]
    pub actual_column: String,

    #[serde(default = "default_predicted_column")]
    #[schemars(title = "Predicted Label Column")]
    pub predicted_column: String,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            predictions: PathBuf::new(),
            actual_column: default_actual_column(),
            predicted_column: default_predicted_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Convert Attack Logs",
        detailed_message = "Label every capture of the attack logs listed in the metadata."
    ))]
    ConvertAttackLogs(ConvertLogsParams),

    #[strum_discriminants(strum(
        message = "Convert Ambient Logs",
        detailed_message = "Turn ambient captures into all-Benign tables."
    ))]
    ConvertAmbientLogs(ConvertLogsParams),

    #[strum_discriminants(strum(
        message = "Remap Labels",
        detailed_message = "Fold signal-specific labels into Fabrication / Masquerade."
    ))]
    RemapLabels(RemapParams),

    #[strum_discriminants(strum(
        message = "Drop Incomplete Rows",
        detailed_message = "Remove rows with empty fields."
    ))]
    DropIncompleteRows(RewriteParams),

    #[strum_discriminants(strum(
        message = "Resolve Flag Labels",
        detailed_message = "Turn trailing R/T flags into Benign or the attack name."
    ))]
    ResolveFlagLabels(RewriteParams),

    #[strum_discriminants(strum(
        message = "Pad Byte Columns",
        detailed_message = "Fill missing payload bytes with 00."
    ))]
    PadByteColumns(PadParams),

    #[strum_discriminants(strum(
        message = "Add Column",
        detailed_message = "Append a constant column."
    ))]
    AddColumn(AddColumnParams),

    #[strum_discriminants(strum(
        message = "Remove Column",
        detailed_message = "Drop one column by position."
    ))]
    RemoveColumn(RemoveColumnParams),

    #[strum_discriminants(strum(
        message = "Concatenate",
        detailed_message = "Append same-schema tables into one."
    ))]
    Concatenate(ConcatenateParams),

    #[strum_discriminants(strum(
        message = "Score Predictions",
        detailed_message = "Per-class precision / recall / F1 of a prediction table."
    ))]
    ScorePredictions(ScoreParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a task:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        let params = match kind {
            TaskKind::ConvertAttackLogs | TaskKind::ConvertAmbientLogs => {
                serde_json::to_value(ConvertLogsParams::default())
            }
            TaskKind::RemapLabels => serde_json::to_value(RemapParams::default()),
            TaskKind::DropIncompleteRows | TaskKind::ResolveFlagLabels => {
                serde_json::to_value(RewriteParams::default())
            }
            TaskKind::PadByteColumns => serde_json::to_value(PadParams::default()),
            TaskKind::AddColumn => serde_json::to_value(AddColumnParams::default()),
            TaskKind::RemoveColumn => serde_json::to_value(RemoveColumnParams::default()),
            TaskKind::Concatenate => serde_json::to_value(ConcatenateParams::default()),
            TaskKind::ScorePredictions => serde_json::to_value(ScoreParams::default()),
        };
        params.unwrap_or_default()
    }
}
