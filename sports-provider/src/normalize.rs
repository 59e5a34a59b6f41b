//! Response normalization
//!
//! Provider list endpoints return JSON arrays whose elements are sometimes
//! objects and sometimes JSON documents encoded as strings. Each endpoint
//! decides what happens to strings that fail to parse.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sports_core::Entry;
use tracing::debug;

/// One element of a provider list, before decoding
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    /// Already an object or array
    Structured(Value),
    /// A JSON document encoded as a string
    Encoded(String),
    /// Scalars and nulls
    Other(Value),
}

impl From<Value> for RawEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RawEntry::Encoded(s),
            Value::Object(_) | Value::Array(_) => RawEntry::Structured(value),
            other => RawEntry::Other(other),
        }
    }
}

/// What to do with list elements that are strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Leave every element untouched
    AsIs,
    /// Parse strings; drop the ones that are not valid JSON
    DropOnError,
    /// Parse strings; keep the ones that are not valid JSON as plain strings
    PassThroughOnError,
}

impl RawEntry {
    fn resolve(self, policy: DecodePolicy) -> Option<Value> {
        match self {
            RawEntry::Structured(v) | RawEntry::Other(v) => Some(v),
            RawEntry::Encoded(s) => match policy {
                DecodePolicy::AsIs => Some(Value::String(s)),
                DecodePolicy::DropOnError => serde_json::from_str(&s).ok(),
                DecodePolicy::PassThroughOnError => {
                    Some(serde_json::from_str(&s).unwrap_or(Value::String(s)))
                }
            },
        }
    }
}

/// Turn a response body into a list of values.
///
/// Bodies that are not arrays yield an empty list.
pub fn normalize(body: Value, policy: DecodePolicy) -> Vec<Value> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| RawEntry::from(item).resolve(policy))
            .collect(),
        _ => Vec::new(),
    }
}

/// Decode each object into `T`, dropping everything else. Used where only
/// objects are meaningful (sessions).
pub fn decode_records<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if records.len() != total {
        debug!("Dropped {} malformed entries of {}", total - records.len(), total);
    }

    records
}

/// Decode each object into `T`, keeping everything else verbatim
pub fn decode_entries<T: DeserializeOwned>(values: Vec<Value>) -> Vec<Entry<T>> {
    values
        .into_iter()
        .map(|v| {
            if v.is_object() {
                match serde_json::from_value::<T>(v.clone()) {
                    Ok(record) => Entry::Record(record),
                    Err(_) => Entry::Raw(v),
                }
            } else {
                Entry::Raw(v)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sports_core::{Odds, Session};

    fn mixed_body() -> Value {
        json!(["{\"a\":1}", { "b": 2 }, "not-json"])
    }

    #[test]
    fn test_drop_on_error() {
        let values = normalize(mixed_body(), DecodePolicy::DropOnError);
        assert_eq!(values, vec![json!({ "a": 1 }), json!({ "b": 2 })]);
    }

    #[test]
    fn test_pass_through_on_error() {
        let values = normalize(mixed_body(), DecodePolicy::PassThroughOnError);
        assert_eq!(values, vec![json!({ "a": 1 }), json!({ "b": 2 }), json!("not-json")]);
    }

    #[test]
    fn test_as_is_leaves_strings_alone() {
        let values = normalize(mixed_body(), DecodePolicy::AsIs);
        assert_eq!(values[0], json!("{\"a\":1}"));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_non_array_body_is_empty() {
        assert!(normalize(json!({ "error": "bad request" }), DecodePolicy::AsIs).is_empty());
        assert!(normalize(json!("Service Unavailable"), DecodePolicy::DropOnError).is_empty());
        assert!(normalize(Value::Null, DecodePolicy::PassThroughOnError).is_empty());
    }

    #[test]
    fn test_raw_entry_classification() {
        assert_eq!(RawEntry::from(json!("x")), RawEntry::Encoded("x".to_string()));
        assert_eq!(RawEntry::from(json!([1])), RawEntry::Structured(json!([1])));
        assert_eq!(RawEntry::from(json!(3)), RawEntry::Other(json!(3)));
    }

    #[test]
    fn test_decode_entries_keeps_raw() {
        let values = normalize(
            json!(["{\"marketId\":\"1.1\"}", "not-json", 5]),
            DecodePolicy::PassThroughOnError,
        );
        let entries: Vec<Entry<Odds>> = decode_entries(values);

        assert_eq!(entries.len(), 3);
        assert!(entries[0].record().is_some());
        assert_eq!(entries[1], Entry::Raw(json!("not-json")));
        assert_eq!(entries[2], Entry::Raw(json!(5)));
    }

    #[test]
    fn test_as_is_listing_keeps_every_element() {
        let values = normalize(
            json!(["{\"marketId\":\"p1\"}", { "marketId": "p2" }, { "marketId": "p3", "marketName": 9 }]),
            DecodePolicy::AsIs,
        );
        let entries: Vec<Entry<sports_core::MarketItem>> = decode_entries(values);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], Entry::Raw(json!("{\"marketId\":\"p1\"}")));
        assert!(entries[1].record().is_some());
        assert!(entries[2].record().is_some());
    }

    #[test]
    fn test_decode_records_drops_scalars() {
        let sessions: Vec<Session> = decode_records(vec![
            json!({ "gtype": "session", "RunnerName": "A" }),
            json!(null),
            json!("stray"),
        ]);
        assert_eq!(sessions.len(), 1);
    }
}
