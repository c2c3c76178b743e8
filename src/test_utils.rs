//! Test utilities for Journeyscope
//!
//! Small builders for steps, events and parameters so tests can describe a
//! journey in a line or two.

use crate::model::{AnalyticsEvent, EventParameter, JourneyStep};

/// Build a step with the given ordering key and events
pub fn step(id: &str, order: Option<i64>, events: Vec<AnalyticsEvent>) -> JourneyStep {
    JourneyStep {
        id: id.to_string(),
        name: Some(format!("Step {}", id)),
        description: Some(String::new()),
        order,
        events,
    }
}

/// Build a configured event with the given timestamp
pub fn event(id: &str, timestamp: Option<i64>) -> AnalyticsEvent {
    AnalyticsEvent {
        id: Some(id.to_string()),
        name: Some(format!("event {}", id)),
        description: None,
        status: Some("live".to_string()),
        video_url: None,
        timestamp,
        properties: Vec::new(),
    }
}

/// Build a configured event carrying a video URL
pub fn video_event(id: &str, timestamp: i64, video_url: &str) -> AnalyticsEvent {
    AnalyticsEvent {
        video_url: Some(video_url.to_string()),
        ..event(id, Some(timestamp))
    }
}

/// Build an unconfigured placeholder event
pub fn placeholder_event() -> AnalyticsEvent {
    AnalyticsEvent {
        id: None,
        name: None,
        description: None,
        status: None,
        video_url: None,
        timestamp: None,
        properties: Vec::new(),
    }
}

/// Build a parameter with the given ordering key
pub fn param(name: &str, order: Option<i64>) -> EventParameter {
    EventParameter {
        name: name.to_string(),
        kind: Some("string".to_string()),
        description: Some(format!("{} parameter", name)),
        value: None,
        order,
    }
}
