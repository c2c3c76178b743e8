//! Journey data fetching and normalization
//!
//! [`JourneyDataFetcher`] pulls a journey's step list from the service and
//! turns it into a [`JourneyModel`]:
//!
//! - steps ascending by `order`
//! - events within a step ascending by `timestamp`
//! - parameters within each property group ascending by `order`
//!
//! Missing keys sort as 0 and every sort is stable, so ties keep the order
//! the service sent them in.

use crate::error::{error_kind, JourneyError, Result};
use crate::model::{AnalyticsEvent, JourneyStep};
use crate::service::JourneyService;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A journey's normalized step/event tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyModel {
    pub journey_id: String,
    pub steps: Vec<JourneyStep>,
}

impl JourneyModel {
    /// Normalize raw steps into a model
    pub fn new(journey_id: impl Into<String>, steps: Vec<JourneyStep>) -> Self {
        Self {
            journey_id: journey_id.into(),
            steps: normalize_steps(steps),
        }
    }

    /// Find the step owning a configured event, first in sort order
    pub fn find_event(&self, event_id: &str) -> Option<(&JourneyStep, &AnalyticsEvent)> {
        self.steps.iter().find_map(|step| {
            step.configured_events()
                .find(|event| event.has_id(event_id))
                .map(|event| (step, event))
        })
    }

    /// Configured events across all steps, in step then timestamp order
    pub fn configured_events(&self) -> impl Iterator<Item = (&JourneyStep, &AnalyticsEvent)> {
        self.steps
            .iter()
            .flat_map(|step| step.configured_events().map(move |event| (step, event)))
    }

    /// Total configured events in the journey
    pub fn configured_event_count(&self) -> usize {
        self.steps.iter().map(JourneyStep::configured_event_count).sum()
    }

    /// Steps matching a case-insensitive query
    ///
    /// A step matches on its own name or description, or on the name or
    /// description of any of its events. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&JourneyStep> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.steps.iter().collect();
        }

        let hit = |text: Option<&str>| {
            text.map(|t| t.to_lowercase().contains(&query))
                .unwrap_or(false)
        };

        self.steps
            .iter()
            .filter(|step| {
                hit(step.name.as_deref())
                    || hit(step.description.as_deref())
                    || step
                        .events
                        .iter()
                        .any(|e| hit(e.name.as_deref()) || hit(e.description.as_deref()))
            })
            .collect()
    }
}

/// Sort steps, their events, and every event's parameters
pub fn normalize_steps(mut steps: Vec<JourneyStep>) -> Vec<JourneyStep> {
    steps.sort_by_key(JourneyStep::order_key);
    for step in &mut steps {
        normalize_events(&mut step.events);
    }
    steps
}

/// Sort events by timestamp and their parameters by order
pub fn normalize_events(events: &mut [AnalyticsEvent]) {
    events.sort_by_key(AnalyticsEvent::timestamp_key);
    for event in events.iter_mut() {
        normalize_event(event);
    }
}

/// Sort every property group's parameters by order
pub fn normalize_event(event: &mut AnalyticsEvent) {
    for group in &mut event.properties {
        group.properties.sort_by_key(|param| param.order_key());
    }
}

/// Fetches and normalizes journey step data
pub struct JourneyDataFetcher {
    service: Arc<dyn JourneyService>,
}

impl JourneyDataFetcher {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self { service }
    }

    /// Fetch a journey's steps and normalize them
    ///
    /// Issues exactly one request. Every failure is reported as
    /// [`JourneyError::DataUnavailable`]; no partial model is returned.
    pub async fn fetch_steps(&self, journey_id: &str) -> Result<JourneyModel> {
        tracing::debug!("Fetching steps for journey {}", journey_id);

        let steps = self
            .service
            .journey_steps(journey_id)
            .await
            .map_err(as_data_unavailable)?;

        let model = JourneyModel::new(journey_id, steps);
        tracing::debug!(
            "Journey {} normalized: {} steps, {} configured events",
            journey_id,
            model.steps.len(),
            model.configured_event_count()
        );
        Ok(model)
    }

    /// Fetch a single event's documentation with its parameters sorted
    pub async fn fetch_event(&self, journey_id: &str, event_id: &str) -> Result<AnalyticsEvent> {
        let mut event = self
            .service
            .event_details(journey_id, event_id)
            .await
            .map_err(as_data_unavailable)?;
        normalize_event(&mut event);
        Ok(event)
    }
}

fn as_data_unavailable(err: anyhow::Error) -> anyhow::Error {
    match error_kind(&err) {
        Some(JourneyError::DataUnavailable(_)) => err,
        _ => JourneyError::DataUnavailable(err.to_string()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticJourneyService;
    use crate::test_utils::{event, param, placeholder_event, step};
    use crate::model::EventPropertyGroup;

    fn ids(steps: &[JourneyStep]) -> Vec<&str> {
        steps.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_steps_sorted_by_order() {
        let steps = normalize_steps(vec![step("a", Some(2), vec![]), step("b", Some(1), vec![])]);
        assert_eq!(ids(&steps), vec!["b", "a"]);
    }

    #[test]
    fn test_step_sort_is_stable_and_missing_order_is_zero() {
        let steps = normalize_steps(vec![
            step("x", Some(1), vec![]),
            step("y", None, vec![]),
            step("z", Some(0), vec![]),
            step("w", Some(1), vec![]),
            step("v", Some(-1), vec![]),
        ]);
        assert_eq!(ids(&steps), vec!["v", "y", "z", "x", "w"]);
    }

    #[test]
    fn test_events_sorted_by_timestamp_stable() {
        let steps = normalize_steps(vec![step(
            "s",
            Some(1),
            vec![
                event("late", Some(300)),
                event("none", None),
                event("early", Some(100)),
                event("tie-1", Some(200)),
                event("tie-2", Some(200)),
                event("zero", Some(0)),
            ],
        )]);

        let order: Vec<_> = steps[0]
            .events
            .iter()
            .map(|e| e.id.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["none", "zero", "early", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn test_parameters_sorted_by_order_stable() {
        let mut ev = event("e", Some(1));
        ev.properties = vec![EventPropertyGroup {
            name: Some("context".to_string()),
            properties: vec![
                param("c", Some(3)),
                param("unset", None),
                param("a", Some(1)),
                param("b1", Some(2)),
                param("b2", Some(2)),
            ],
        }];

        let steps = normalize_steps(vec![step("s", None, vec![ev])]);
        let names: Vec<_> = steps[0].events[0].properties[0]
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["unset", "a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_placeholders_excluded_from_counts() {
        let model = JourneyModel::new(
            "j",
            vec![
                step("s1", Some(1), vec![placeholder_event(), event("e1", Some(1))]),
                step("s2", Some(2), vec![placeholder_event()]),
            ],
        );
        assert_eq!(model.steps[0].configured_event_count(), 1);
        assert_eq!(model.steps[1].configured_event_count(), 0);
        assert_eq!(model.configured_event_count(), 1);
        assert_eq!(model.configured_events().count(), 1);
    }

    #[test]
    fn test_find_event_first_step_wins() {
        let model = JourneyModel::new(
            "j",
            vec![
                step("second", Some(2), vec![event("dup", Some(1))]),
                step("first", Some(1), vec![event("dup", Some(1))]),
            ],
        );
        let (owner, found) = model.find_event("dup").unwrap();
        assert_eq!(owner.id, "first");
        assert!(found.has_id("dup"));
        assert!(model.find_event("missing").is_none());
    }

    #[test]
    fn test_search_matches_steps_and_events() {
        let mut signup = event("e1", Some(1));
        signup.name = Some("Signup Submitted".to_string());
        let mut landing = step("landing", Some(1), vec![]);
        landing.description = Some("Marketing page".to_string());

        let model = JourneyModel::new(
            "j",
            vec![landing, step("form", Some(2), vec![signup])],
        );

        assert_eq!(model.search("  ").len(), 2);
        let hits: Vec<_> = model.search("SIGNUP").iter().map(|s| s.id.clone()).collect();
        assert_eq!(hits, vec!["form"]);
        let hits: Vec<_> = model.search("marketing").iter().map(|s| s.id.clone()).collect();
        assert_eq!(hits, vec!["landing"]);
        assert!(model.search("nothing-like-this").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_steps_normalizes() {
        let service = Arc::new(StaticJourneyService::new().with_steps(
            "j1",
            vec![step("a", Some(2), vec![]), step("b", Some(1), vec![])],
        ));
        let fetcher = JourneyDataFetcher::new(service.clone());

        let model = fetcher.fetch_steps("j1").await.unwrap();
        assert_eq!(model.journey_id, "j1");
        assert_eq!(ids(&model.steps), vec!["b", "a"]);
        assert_eq!(service.calls("journey_steps"), 1);
    }

    #[tokio::test]
    async fn test_fetch_steps_failure_is_data_unavailable() {
        let service = Arc::new(StaticJourneyService::new());
        service.fail("journey_steps");
        let fetcher = JourneyDataFetcher::new(service.clone());

        let err = fetcher.fetch_steps("j1").await.unwrap_err();
        assert!(matches!(
            error_kind(&err),
            Some(JourneyError::DataUnavailable(_))
        ));
        assert_eq!(service.calls("journey_steps"), 1);
    }

    #[tokio::test]
    async fn test_fetch_event_sorts_parameters() {
        let mut ev = event("e1", Some(5));
        ev.properties = vec![EventPropertyGroup {
            name: None,
            properties: vec![param("second", Some(2)), param("first", Some(1))],
        }];
        let service = Arc::new(
            StaticJourneyService::new().with_steps("j1", vec![step("s", None, vec![ev])]),
        );
        let fetcher = JourneyDataFetcher::new(service);

        let fetched = fetcher.fetch_event("j1", "e1").await.unwrap();
        assert_eq!(fetched.properties[0].properties[0].name, "first");
    }
}
