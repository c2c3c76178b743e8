//! Journey data model
//!
//! Typed records for everything the journey service returns. Optional
//! fields stay optional here; ordering keys and placeholder events are
//! resolved by the fetcher when it normalizes a response.

pub mod lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown for a parameter without an example value
pub const MISSING_VALUE: &str = "-";

/// Raw journey record as returned by `get-org-journeys`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub step_count: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated_at: Option<String>,
}

/// A named, ordered product flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Journey {
    /// Build a journey from its wire record
    ///
    /// The service does not send a creation time, so `fetched_at` stands in
    /// for it, and for `updated_at` when that cannot be parsed.
    pub fn from_record(record: JourneyRecord, fetched_at: DateTime<Utc>) -> Self {
        let updated_at = match record.updated_at.as_deref() {
            Some(raw) => lenient::parse_timestamp(raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Journey {} has unparseable updated_at {:?}; using fetch time",
                    record.id,
                    raw
                );
                fetched_at
            }),
            None => fetched_at,
        };

        let step_count = record.step_count.unwrap_or_else(|| "0".to_string());

        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            created_at: fetched_at,
            updated_at,
            tags: vec![format!("{} steps", step_count)],
        }
    }

    /// Identifier and name only, as used by navigation
    pub fn to_ref(&self) -> JourneyRef {
        JourneyRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Case-insensitive match on name or description
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Journey identity used by prev/next navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyRef {
    pub id: String,
    pub name: String,
}

/// An ordered stage of a journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyStep {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub events: Vec<AnalyticsEvent>,
}

impl JourneyStep {
    /// Ordering key; absent sorts as 0
    pub fn order_key(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Events that carry an identifier, in their current order
    pub fn configured_events(&self) -> impl Iterator<Item = &AnalyticsEvent> {
        self.events.iter().filter(|event| event.is_configured())
    }

    /// Count shown on the step's event badge
    pub fn configured_event_count(&self) -> usize {
        self.configured_events().count()
    }
}

/// An analytics occurrence documented on a step
///
/// An event without an identifier is an unconfigured placeholder and is
/// never rendered, counted or matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub properties: Vec<EventPropertyGroup>,
}

impl AnalyticsEvent {
    pub fn is_configured(&self) -> bool {
        self.id.is_some()
    }

    /// Sort key; absent sorts as 0
    pub fn timestamp_key(&self) -> i64 {
        self.timestamp.unwrap_or(0)
    }

    pub fn has_id(&self, event_id: &str) -> bool {
        self.id.as_deref() == Some(event_id)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Total parameters across all property groups
    pub fn parameter_count(&self) -> usize {
        self.properties.iter().map(|g| g.properties.len()).sum()
    }
}

/// A named group of event parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPropertyGroup {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub properties: Vec<EventParameter>,
}

impl EventPropertyGroup {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Properties")
    }
}

/// A documented parameter of an analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub order: Option<i64>,
}

impl EventParameter {
    /// Ordering key; absent sorts as 0
    pub fn order_key(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Example value, or a dash when none is documented
    pub fn display_value(&self) -> &str {
        match self.value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => MISSING_VALUE,
        }
    }
}

/// A captured session used for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecording {
    pub id: String,
    #[serde(default)]
    pub journey_id: String,
    #[serde(deserialize_with = "lenient::datetime")]
    pub start_time: DateTime<Utc>,
    /// Total length in milliseconds
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub duration: i64,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub events: Vec<RecordedEvent>,
}

/// One event on a recording's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    pub event_id: String,
    /// Absolute epoch milliseconds
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub timestamp: i64,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// User resolved from an external auth identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub org_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub auth0_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_journey_from_record() {
        let record: JourneyRecord = serde_json::from_value(json!({
            "id": "j1",
            "name": "Onboarding",
            "description": "First run",
            "step_count": "4",
            "updated_at": "2024-05-20T08:00:00Z"
        }))
        .unwrap();

        let journey = Journey::from_record(record, fetched_at());
        assert_eq!(journey.id, "j1");
        assert_eq!(journey.tags, vec!["4 steps".to_string()]);
        assert_eq!(journey.created_at, fetched_at());
        assert_eq!(
            journey.updated_at,
            Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_journey_numeric_step_count_and_bad_date() {
        let record: JourneyRecord = serde_json::from_value(json!({
            "id": "j2",
            "name": "Checkout",
            "description": null,
            "step_count": 7,
            "updated_at": "not a date"
        }))
        .unwrap();

        let journey = Journey::from_record(record, fetched_at());
        assert_eq!(journey.tags, vec!["7 steps".to_string()]);
        assert_eq!(journey.description, "");
        assert_eq!(journey.updated_at, fetched_at());
    }

    #[test]
    fn test_journey_matches_is_case_insensitive() {
        let record: JourneyRecord =
            serde_json::from_value(json!({"id": "j", "name": "Signup Flow", "description": "Email capture"}))
                .unwrap();
        let journey = Journey::from_record(record, fetched_at());
        assert!(journey.matches("signup"));
        assert!(journey.matches("EMAIL"));
        assert!(!journey.matches("checkout"));
    }

    #[test]
    fn test_placeholder_events_are_not_configured() {
        let step: JourneyStep = serde_json::from_value(json!({
            "id": "s1",
            "name": "Landing",
            "events": [
                {"id": null, "name": null},
                {"id": "e1", "name": "page_view"},
                {"name": "orphan"}
            ]
        }))
        .unwrap();

        assert_eq!(step.events.len(), 3);
        assert_eq!(step.configured_event_count(), 1);
        assert_eq!(step.order_key(), 0);
    }

    #[test]
    fn test_event_parameters_and_defaults() {
        let event: AnalyticsEvent = serde_json::from_value(json!({
            "id": "e1",
            "timestamp": "1717000000000",
            "properties": [
                {"name": null, "properties": [
                    {"name": "plan", "type": "string", "description": "Plan tier", "value": null},
                    {"name": "seats", "type": "number", "description": "Seat count", "value": 5, "order": 1}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(event.timestamp_key(), 1_717_000_000_000);
        assert_eq!(event.parameter_count(), 2);
        let group = &event.properties[0];
        assert_eq!(group.display_name(), "Properties");
        assert_eq!(group.properties[0].display_value(), MISSING_VALUE);
        assert_eq!(group.properties[1].display_value(), "5");
        assert_eq!(group.properties[1].kind.as_deref(), Some("number"));
    }

    #[test]
    fn test_session_recording_wire_shape() {
        let recording: SessionRecording = serde_json::from_value(json!({
            "id": "r1",
            "journeyId": "j1",
            "startTime": "2024-05-01T10:00:00Z",
            "duration": 12000,
            "events": [
                {"eventId": "e1", "timestamp": 1714557603000i64, "parameters": {"plan": "pro"}}
            ]
        }))
        .unwrap();

        assert_eq!(recording.journey_id, "j1");
        assert_eq!(recording.duration, 12_000);
        assert_eq!(recording.events[0].parameters["plan"], json!("pro"));
    }

    #[test]
    fn test_session_recording_epoch_start_time() {
        let recording: SessionRecording = serde_json::from_value(json!({
            "id": "r1",
            "startTime": 1714557600000i64,
            "events": null
        }))
        .unwrap();

        assert_eq!(recording.start_time.timestamp_millis(), 1_714_557_600_000);
        assert!(recording.events.is_empty());
    }
}
