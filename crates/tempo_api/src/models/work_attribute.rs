use serde::Deserialize;

use super::lenient::{flag_field, string_field, string_list};

/// Represents a configurable work attribute that worklogs may carry.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkAttribute {
    #[serde(default, deserialize_with = "string_field")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "string_field")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "flag_field")]
    pub required: bool,
    #[serde(default, deserialize_with = "string_list")]
    pub values: Vec<String>,
}
