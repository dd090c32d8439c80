use anyhow::{Context, Result};
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum::{EnumMessage, IntoEnumIterator};

/// A serde enum tagged as `{"type": <kind>, "params": {...}}` whose variants
/// the wizard can offer and fill in from the JSON schema.
pub trait UIChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    /// Fieldless twin of the enum; its `&'static str` form is the `type` tag.
    type Kind: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator;

    fn schema() -> Schema;

    fn prompt_label() -> &'static str;

    fn prompt_help() -> Option<&'static str> {
        Some("arrows move, enter selects, type to filter")
    }

    /// `params` object prefilled with the defaults of `kind`.
    fn default_params(kind: Self::Kind) -> Value;

    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self> {
        let tag: &'static str = kind.into();
        serde_json::from_value(json!({ "type": tag, "params": params }))
            .with_context(|| format!("invalid parameters for '{tag}'"))
    }
}
