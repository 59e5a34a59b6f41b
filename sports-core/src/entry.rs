//! List elements that may or may not fit a typed record

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A list element that either decoded into `T` or was kept as the raw
/// value the provider sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Record(T),
    Raw(Value),
}

impl<T> Entry<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Entry::Record(r) => Some(r),
            Entry::Raw(_) => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Entry::Record(r) => Some(r),
            Entry::Raw(_) => None,
        }
    }
}

/// Keep the decoded records of a list, skipping raw elements
pub fn records<T>(entries: Vec<Entry<T>>) -> Vec<T> {
    entries.into_iter().filter_map(Entry::into_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::FancyMarket;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_transparently() {
        let entries: Vec<Entry<FancyMarket>> =
            serde_json::from_value(json!([{ "marketId": "p1", "min": 100 }, "{\"marketId\":\"p2\"}", 7])).unwrap();

        assert!(entries[0].record().is_some());
        assert_eq!(entries[1], Entry::Raw(json!("{\"marketId\":\"p2\"}")));
        assert_eq!(
            serde_json::to_value(&entries).unwrap(),
            json!([{ "marketId": "p1", "min": 100 }, "{\"marketId\":\"p2\"}", 7])
        );
        assert_eq!(records(entries).len(), 1);
    }
}
