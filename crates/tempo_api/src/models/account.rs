use serde::Deserialize;

use super::lenient::{flag_field, string_field};

/// Represents a Tempo account (billing/cost bucket that worklogs can be attributed to).
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "string_field")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub status: Option<String>,
    #[serde(default, rename = "global", deserialize_with = "flag_field")]
    pub is_global: bool,
}

impl Account {
    pub fn is_open(&self) -> bool {
        self.status
            .as_deref()
            .map(|status| status.eq_ignore_ascii_case("OPEN"))
            .unwrap_or(false)
    }
}
