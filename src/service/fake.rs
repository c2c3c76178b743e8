//! In-memory journey service for unit and integration tests
//!
//! [`StaticJourneyService`] answers from data registered up front and counts
//! the requests it receives, so tests can assert both what a view rendered
//! and how many fetches it took.
//!
//! # Example
//!
//! ```
//! use journeyscope::service::{JourneyService, StaticJourneyService};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = StaticJourneyService::new()
//!     .with_journey("org-1", "j1", "Onboarding");
//!
//! let journeys = service.list_journeys("org-1").await.unwrap();
//! assert_eq!(journeys.len(), 1);
//! assert_eq!(service.calls("list_journeys"), 1);
//! # }
//! ```

use crate::error::{JourneyError, Result};
use crate::model::{AnalyticsEvent, JourneyRecord, JourneyStep, SessionRecording, User};
use crate::service::{JourneyService, NO_RECORDING_MESSAGE};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Journey service backed by in-memory maps
#[derive(Default)]
pub struct StaticJourneyService {
    users: HashMap<String, User>,
    journeys: HashMap<String, Vec<JourneyRecord>>,
    steps: HashMap<String, Vec<JourneyStep>>,
    recordings: HashMap<(String, String), SessionRecording>,
    failing: RwLock<HashSet<&'static str>>,
    offline: AtomicBool,
    calls: RwLock<HashMap<&'static str, usize>>,
}

impl StaticJourneyService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user for `resolve_user`
    pub fn with_user(mut self, auth0_id: &str, user_id: &str, org_id: &str) -> Self {
        self.users.insert(
            auth0_id.to_string(),
            User {
                id: user_id.to_string(),
                org_id: org_id.to_string(),
                first_name: None,
                last_name: None,
                email: None,
                auth0_id: Some(auth0_id.to_string()),
            },
        );
        self
    }

    /// Append a journey to an organization's list
    pub fn with_journey(mut self, org_id: &str, journey_id: &str, name: &str) -> Self {
        self.journeys
            .entry(org_id.to_string())
            .or_default()
            .push(JourneyRecord {
                id: journey_id.to_string(),
                name: Some(name.to_string()),
                description: Some(format!("{} journey", name)),
                step_count: Some("0".to_string()),
                updated_at: Some("2024-05-01T00:00:00Z".to_string()),
            });
        self
    }

    /// Set the raw steps returned for a journey
    pub fn with_steps(mut self, journey_id: &str, steps: Vec<JourneyStep>) -> Self {
        self.steps.insert(journey_id.to_string(), steps);
        self
    }

    /// Attach a recording to an event
    pub fn with_recording(
        mut self,
        journey_id: &str,
        event_id: &str,
        recording: SessionRecording,
    ) -> Self {
        self.recordings
            .insert((journey_id.to_string(), event_id.to_string()), recording);
        self
    }

    /// Make one operation fail with `DataUnavailable`
    pub fn fail(&self, operation: &'static str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(operation);
        }
    }

    /// Let a previously failing operation succeed again
    pub fn recover(&self, operation: &'static str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.remove(operation);
        }
    }

    /// Make every operation fail, as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of requests received for an operation
    pub fn calls(&self, operation: &'static str) -> usize {
        self.calls
            .read()
            .map(|calls| calls.get(operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        if let Ok(mut calls) = self.calls.write() {
            *calls.entry(operation).or_insert(0) += 1;
        }

        let failing = self
            .failing
            .read()
            .map(|failing| failing.contains(operation))
            .unwrap_or(false);

        if failing || self.offline.load(Ordering::SeqCst) {
            return Err(JourneyError::DataUnavailable(format!("{} unavailable", operation)).into());
        }
        Ok(())
    }
}

#[async_trait]
impl JourneyService for StaticJourneyService {
    async fn resolve_user(&self, auth0_id: &str) -> Result<User> {
        self.record("resolve_user")?;
        self.users
            .get(auth0_id)
            .cloned()
            .ok_or_else(|| JourneyError::DataUnavailable("User not found".to_string()).into())
    }

    async fn list_journeys(&self, org_id: &str) -> Result<Vec<JourneyRecord>> {
        self.record("list_journeys")?;
        Ok(self.journeys.get(org_id).cloned().unwrap_or_default())
    }

    async fn journey_steps(&self, journey_id: &str) -> Result<Vec<JourneyStep>> {
        self.record("journey_steps")?;
        Ok(self.steps.get(journey_id).cloned().unwrap_or_default())
    }

    async fn event_details(&self, journey_id: &str, event_id: &str) -> Result<AnalyticsEvent> {
        self.record("event_details")?;
        self.steps
            .get(journey_id)
            .into_iter()
            .flatten()
            .flat_map(|step| step.events.iter())
            .find(|event| event.has_id(event_id))
            .cloned()
            .ok_or_else(|| {
                JourneyError::DataUnavailable("Failed to load event details".to_string()).into()
            })
    }

    async fn session_recording(
        &self,
        journey_id: &str,
        event_id: &str,
    ) -> Result<SessionRecording> {
        self.record("session_recording")?;
        self.recordings
            .get(&(journey_id.to_string(), event_id.to_string()))
            .cloned()
            .ok_or_else(|| JourneyError::NotFound(NO_RECORDING_MESSAGE.to_string()).into())
    }
}
