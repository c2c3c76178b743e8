//! Journey service abstraction
//!
//! The remote journey service owns all persistent data. This module defines
//! the [`JourneyService`] trait every view fetches through, the HTTP
//! implementation used in production, and an in-memory fake for tests.

pub mod fake;
pub mod http;

pub use fake::StaticJourneyService;
pub use http::HttpJourneyService;

use crate::error::Result;
use crate::model::{AnalyticsEvent, JourneyRecord, JourneyStep, SessionRecording, User};
use async_trait::async_trait;

/// Message the service uses to say an event has no recording
pub const NO_RECORDING_MESSAGE: &str = "No recording found";

/// Endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const GET_USER: &str = "/get-user";
    pub const GET_ORG_JOURNEYS: &str = "/get-org-journeys";
    pub const GET_JOURNEY_STEPS: &str = "/get-journey-steps";
    pub const GET_EVENT_DETAILS: &str = "/get-event-details";
    pub const GET_SESSION_RECORDING: &str = "/get-session-recording";
}

/// Request/response operations offered by the journey service
///
/// Every method issues exactly one request. Transport failures, non-OK
/// statuses, malformed bodies and `success: false` all surface as
/// [`crate::error::JourneyError::DataUnavailable`]. Nothing is retried.
#[async_trait]
pub trait JourneyService: Send + Sync {
    /// Resolve the user behind an external auth identifier
    async fn resolve_user(&self, auth0_id: &str) -> Result<User>;

    /// List the raw journey records of an organization, in service order
    async fn list_journeys(&self, org_id: &str) -> Result<Vec<JourneyRecord>>;

    /// Fetch the steps of a journey, unsorted
    async fn journey_steps(&self, journey_id: &str) -> Result<Vec<JourneyStep>>;

    /// Fetch a single event's documentation
    async fn event_details(&self, journey_id: &str, event_id: &str) -> Result<AnalyticsEvent>;

    /// Fetch the recording attached to an event
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::JourneyError::NotFound`] when the service
    /// reports that no recording exists.
    async fn session_recording(&self, journey_id: &str, event_id: &str)
        -> Result<SessionRecording>;
}
