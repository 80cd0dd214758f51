use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{
    optional_seconds_field, or_default, seconds_field, string_field, text_field,
};
use crate::error::{Result, TempoError};

pub const DEFAULT_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogIssue {
    #[serde(default, deserialize_with = "string_field")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub id: Option<String>,
}

impl WorklogIssue {
    /// Best available issue label: key, then numeric id.
    pub fn label(&self) -> String {
        self.key
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    #[serde(default, deserialize_with = "string_field")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub account_id: Option<String>,
}

impl WorklogAuthor {
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.account_id.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Represents a worklog as returned by the worklogs endpoints, read leniently.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(default, deserialize_with = "string_field")]
    pub tempo_worklog_id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub issue: WorklogIssue,
    #[serde(default, deserialize_with = "seconds_field")]
    pub time_spent_seconds: u64,
    #[serde(default, deserialize_with = "optional_seconds_field")]
    pub billable_seconds: Option<u64>,
    #[serde(default, deserialize_with = "text_field")]
    pub start_date: String,
    #[serde(default, deserialize_with = "string_field")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub description: String,
    #[serde(default, deserialize_with = "or_default")]
    pub author: WorklogAuthor,
}

/// Body for creating a worklog. Optional fields are omitted from the JSON when unset.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogRequest {
    pub issue_id: i64,
    pub time_spent_seconds: u64,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
}

impl WorklogRequest {
    pub fn new(
        issue_id: i64,
        time_spent_seconds: u64,
        start_date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            issue_id,
            time_spent_seconds,
            start_date,
            start_time: None,
            description: description.into(),
            billable_seconds: None,
            attributes: None,
        }
    }

    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        let start_time = start_time.into();
        self.start_time = if start_time.trim().is_empty() {
            None
        } else {
            Some(start_time)
        };
        self
    }

    pub fn with_billable_seconds(mut self, seconds: u64) -> Self {
        self.billable_seconds = Some(seconds);
        self
    }

    /// Attaches work attribute values; null or empty containers are not sent.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        let populated = match &attributes {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        };
        self.attributes = populated.then_some(attributes);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_billable(Some(self.time_spent_seconds), self.billable_seconds)
    }
}

/// Partial update for an existing worklog. Only fields that are `Some` are sent;
/// an absent field leaves the stored value unchanged.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable_seconds: Option<u64>,
}

impl WorklogUpdate {
    pub fn is_empty(&self) -> bool {
        self == &WorklogUpdate::default()
    }

    pub fn validate(&self) -> Result<()> {
        check_billable(self.time_spent_seconds, self.billable_seconds)
    }
}

fn check_billable(time_spent: Option<u64>, billable: Option<u64>) -> Result<()> {
    match (time_spent, billable) {
        (Some(spent), Some(billable)) if billable > spent => Err(TempoError::InvalidRequest(format!(
            "billable seconds ({billable}) exceed time spent ({spent})"
        ))),
        _ => Ok(()),
    }
}

/// Filters for listing worklogs. Unset filters are left out of the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct WorklogQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub issue_id: Option<i64>,
    pub account_id: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for WorklogQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            project_id: None,
            issue_id: None,
            account_id: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl WorklogQuery {
    /// Query covering a single calendar day.
    pub fn for_day(day: NaiveDate) -> Self {
        Self::default().between(day, day)
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_account_id(mut self, account_id: Option<String>) -> Self {
        self.account_id = account_id.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        if let Some(project_id) = self.project_id {
            pairs.push(("project", project_id.to_string()));
        }
        if let Some(issue_id) = self.issue_id {
            pairs.push(("issue", issue_id.to_string()));
        }
        if let Some(account_id) = &self.account_id {
            pairs.push(("accountId", account_id.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn request_omits_unset_optionals() {
        let request = WorklogRequest::new(10001, 7200, day("2025-05-23"), "New work entry");
        let body = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            body,
            json!({
                "issueId": 10001,
                "timeSpentSeconds": 7200,
                "startDate": "2025-05-23",
                "description": "New work entry"
            })
        );
    }

    #[test]
    fn request_includes_populated_optionals() {
        let request = WorklogRequest::new(1, 3600, day("2025-01-02"), "Review")
            .with_start_time("09:30")
            .with_billable_seconds(1800)
            .with_attributes(json!([{ "key": "_Role_", "value": "dev" }]));
        let body = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(body["startTime"], "09:30");
        assert_eq!(body["billableSeconds"], 1800);
        assert_eq!(body["attributes"][0]["key"], "_Role_");
    }

    #[test]
    fn empty_attributes_and_blank_start_time_are_dropped() {
        let request = WorklogRequest::new(1, 60, day("2025-01-02"), "x")
            .with_attributes(json!({}))
            .with_start_time("  ");
        assert!(request.attributes.is_none());
        assert!(request.start_time.is_none());
    }

    #[test]
    fn billable_above_time_spent_is_rejected() {
        let request = WorklogRequest::new(1, 60, day("2025-01-02"), "x").with_billable_seconds(61);
        assert!(request.validate().is_err());

        let update = WorklogUpdate {
            time_spent_seconds: Some(60),
            billable_seconds: Some(60),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn update_with_description_only_serializes_one_field() {
        let update = WorklogUpdate {
            description: Some("Refined".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(body, json!({ "description": "Refined" }));
        assert!(!update.is_empty());
        assert!(WorklogUpdate::default().is_empty());
    }

    #[test]
    fn query_pairs_skip_unset_filters() {
        let pairs = WorklogQuery::default().to_query_pairs();
        assert_eq!(
            pairs,
            vec![("limit", "50".to_string()), ("offset", "0".to_string())]
        );

        let mut query = WorklogQuery::for_day(day("2025-05-23")).with_account_id(Some("abc".into()));
        query.project_id = Some(10);
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("from", "2025-05-23".to_string())));
        assert!(pairs.contains(&("to", "2025-05-23".to_string())));
        assert!(pairs.contains(&("project", "10".to_string())));
        assert!(pairs.contains(&("accountId", "abc".to_string())));
        assert!(!pairs.iter().any(|(key, _)| *key == "issue"));
    }

    #[test]
    fn worklog_reads_tolerate_missing_and_numeric_fields() {
        let worklog: Worklog = serde_json::from_value(json!({
            "tempoWorklogId": 42,
            "issue": { "id": 10001 },
            "timeSpentSeconds": 5400,
            "startDate": "2025-05-23",
            "author": { "accountId": "557058:abc" }
        }))
        .expect("lenient worklog");
        assert_eq!(worklog.tempo_worklog_id.as_deref(), Some("42"));
        assert_eq!(worklog.issue.label(), "10001");
        assert_eq!(worklog.author.label(), "557058:abc");
        assert_eq!(worklog.description, "");
        assert!(worklog.start_time.is_none());
    }
}
