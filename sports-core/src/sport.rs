//! Sport, series and match listings

use crate::entry::Entry;
use crate::id::ProviderId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event types for which bookmaker and premium fancy markets do not exist
/// (horse racing, greyhound racing).
pub const RACING_EVENT_TYPE_IDS: [&str; 2] = ["7", "4339"];

/// Whether an event type is a racing sport
pub fn is_racing_event_type(event_type_id: &str) -> bool {
    RACING_EVENT_TYPE_IDS.contains(&event_type_id)
}

/// A sport / event type category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    #[serde(rename = "eventType", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<ProviderId>,

    /// Display name, kept in whatever JSON type the provider used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `competition` object inside a series listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProviderId>,

    /// Display name, kept in whatever JSON type the provider used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A series (competition) entry from `listCompetitions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<Entry<Competition>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `event` object inside a match listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProviderId>,

    /// Display name, kept in whatever JSON type the provider used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A match entry from `listEvents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Entry<MatchEvent>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompetitionItem {
    /// The competition object, when it is an object
    pub fn competition(&self) -> Option<&Competition> {
        self.competition.as_ref().and_then(Entry::record)
    }
}

impl MatchItem {
    /// The event object, when it is an object
    pub fn event(&self) -> Option<&MatchEvent> {
        self.event.as_ref().and_then(Entry::record)
    }

    /// The match's event ID, if the listing carried one
    pub fn event_id(&self) -> Option<&ProviderId> {
        self.event().and_then(|e| e.id.as_ref())
    }
}

/// An entry of the live score match list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatch {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_racing_event_types() {
        assert!(is_racing_event_type("7"));
        assert!(is_racing_event_type("4339"));
        assert!(!is_racing_event_type("4"));
        assert!(!is_racing_event_type("07"));
    }

    #[test]
    fn test_match_item_preserves_unknown_fields() {
        let raw = json!({
            "event": { "id": "32990812", "name": "India v Australia", "openDate": "2024-03-01T09:30:00.000Z" },
            "marketCount": 12
        });

        let item: MatchItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.event_id(), Some(&ProviderId::from("32990812")));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_listings_accept_unexpected_field_types() {
        let raw = json!({ "competition": { "id": 101, "name": 2024 }, "marketCount": "3" });

        let item: CompetitionItem = serde_json::from_value(raw.clone()).unwrap();
        let competition = item.competition().unwrap();
        assert_eq!(competition.id, Some(ProviderId::from(101u64)));
        assert_eq!(competition.name, Some(json!(2024)));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);

        let odd: MatchItem = serde_json::from_value(json!({ "event": "TBA" })).unwrap();
        assert!(odd.event.is_some());
        assert!(odd.event().is_none());
        assert_eq!(odd.event_id(), None);
    }
}
