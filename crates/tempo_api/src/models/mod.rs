mod account;
mod lenient;
mod work_attribute;
mod worklog;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub use account::Account;
pub use work_attribute::WorkAttribute;
pub use worklog::{
    Worklog, WorklogAuthor, WorklogIssue, WorklogQuery, WorklogRequest, WorklogUpdate,
    DEFAULT_PAGE_LIMIT,
};

/// Decoded JSON body of a successful call. Empty bodies decode to an empty object.
pub type ApiResult = Value;

/// Extracts the `results` array of a paged response as typed items, skipping entries that do not decode.
pub fn results<T>(payload: &ApiResult) -> Vec<T>
where
    T: DeserializeOwned,
{
    payload
        .get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| <T as Deserialize>::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{results, Account, WorkAttribute, Worklog};
    use serde_json::json;

    #[test]
    fn results_skips_malformed_entries() {
        let payload = json!({
            "results": [
                { "key": "ACC-1", "name": "Internal", "status": "OPEN", "global": true },
                "garbage",
                { "key": "ACC-2", "name": "Client", "status": "CLOSED" }
            ]
        });
        let accounts: Vec<Account> = results(&payload);
        assert_eq!(accounts.len(), 2);
        assert!(accounts[0].is_open() && accounts[0].is_global);
        assert!(!accounts[1].is_open() && !accounts[1].is_global);
    }

    #[test]
    fn null_fields_do_not_drop_entries() {
        let payload = json!({
            "results": [
                { "key": "ACC-1", "name": "Internal", "status": "OPEN", "global": null }
            ]
        });
        let accounts: Vec<Account> = results(&payload);
        assert_eq!(accounts.len(), 1);
        assert!(!accounts[0].is_global);

        let payload = json!({
            "results": [
                { "key": "_Phase_", "name": "Phase", "type": null, "required": null, "values": null }
            ]
        });
        let attributes: Vec<WorkAttribute> = results(&payload);
        assert_eq!(attributes.len(), 1);
        assert!(!attributes[0].required);

        let payload = json!({
            "results": [
                { "timeSpentSeconds": 3600, "description": null, "startDate": null,
                  "billableSeconds": null, "issue": null, "author": null }
            ]
        });
        let worklogs: Vec<Worklog> = results(&payload);
        assert_eq!(worklogs.len(), 1);
        assert_eq!(worklogs[0].time_spent_seconds, 3600);
        assert_eq!(worklogs[0].description, "");
        assert_eq!(worklogs[0].issue.label(), "Unknown");
    }

    #[test]
    fn results_of_non_paged_payload_is_empty() {
        let accounts: Vec<Account> = results(&json!({}));
        assert!(accounts.is_empty());
    }

    #[test]
    fn work_attribute_values_are_stringified() {
        let payload = json!({
            "results": [
                { "key": "_Phase_", "name": "Phase", "type": "STATIC_LIST", "required": true, "values": ["Design", 2, {"x": 1}] }
            ]
        });
        let attributes: Vec<WorkAttribute> = results(&payload);
        assert_eq!(attributes[0].kind.as_deref(), Some("STATIC_LIST"));
        assert_eq!(attributes[0].values, vec!["Design".to_string(), "2".to_string()]);
        assert!(attributes[0].required);
    }
}
