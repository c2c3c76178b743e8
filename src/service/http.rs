//! HTTP implementation of the journey service
//!
//! Every operation is a `POST` with a JSON body against the configured base
//! URL. Responses carry a top-level `success` flag next to the payload.

use crate::config::ServiceConfig;
use crate::error::{JourneyError, Result};
use crate::model::{AnalyticsEvent, JourneyRecord, JourneyStep, SessionRecording, User};
use crate::service::{endpoints, JourneyService, NO_RECORDING_MESSAGE};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Journey service reached over HTTP
///
/// # Examples
///
/// ```
/// use journeyscope::config::ServiceConfig;
/// use journeyscope::service::HttpJourneyService;
///
/// let config = ServiceConfig {
///     base_url: "http://localhost:8080/".to_string(),
///     ..Default::default()
/// };
/// let service = HttpJourneyService::new(&config).unwrap();
/// assert_eq!(service.base_url(), "http://localhost:8080");
/// ```
pub struct HttpJourneyService {
    client: Client,
    base_url: String,
}

/// Top-level response shape shared by every endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Envelope {
    /// Extract a payload field from a successful response
    fn take<T: DeserializeOwned>(mut self, field: &str) -> Result<T> {
        if !self.success {
            let message = self
                .message
                .unwrap_or_else(|| "service reported failure".to_string());
            return Err(JourneyError::DataUnavailable(message).into());
        }

        let value = match self.payload.remove(field) {
            Some(Value::Null) | None => {
                return Err(JourneyError::DataUnavailable(format!(
                    "response is missing `{}`",
                    field
                ))
                .into())
            }
            Some(value) => value,
        };

        serde_json::from_value(value).map_err(|e| {
            tracing::error!("Failed to parse `{}` from journey service: {}", field, e);
            JourneyError::DataUnavailable(format!("malformed `{}`: {}", field, e)).into()
        })
    }

    fn has(&self, field: &str) -> bool {
        matches!(self.payload.get(field), Some(v) if !v.is_null())
    }
}

impl HttpJourneyService {
    /// Create a new HTTP journey service client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                JourneyError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Envelope> {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            JourneyError::DataUnavailable(format!("request to {} failed: {}", path, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Journey service returned {} for {}: {}", status, path, error_text);
            return Err(JourneyError::DataUnavailable(format!("HTTP status {}", status)).into());
        }

        let text = response.text().await.map_err(|e| {
            JourneyError::DataUnavailable(format!("failed to read response body: {}", e))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Malformed response from {}: {}", path, e);
            JourneyError::DataUnavailable(format!("malformed response body: {}", e)).into()
        })
    }
}

#[async_trait]
impl JourneyService for HttpJourneyService {
    async fn resolve_user(&self, auth0_id: &str) -> Result<User> {
        self.post(endpoints::GET_USER, json!({ "auth0_id": auth0_id }))
            .await?
            .take("user")
    }

    async fn list_journeys(&self, org_id: &str) -> Result<Vec<JourneyRecord>> {
        self.post(endpoints::GET_ORG_JOURNEYS, json!({ "org_id": org_id }))
            .await?
            .take("journeys")
    }

    async fn journey_steps(&self, journey_id: &str) -> Result<Vec<JourneyStep>> {
        self.post(endpoints::GET_JOURNEY_STEPS, json!({ "journey_id": journey_id }))
            .await?
            .take("steps")
    }

    async fn event_details(&self, journey_id: &str, event_id: &str) -> Result<AnalyticsEvent> {
        self.post(
            endpoints::GET_EVENT_DETAILS,
            json!({ "journey_id": journey_id, "event_id": event_id }),
        )
        .await?
        .take("event")
    }

    async fn session_recording(
        &self,
        journey_id: &str,
        event_id: &str,
    ) -> Result<SessionRecording> {
        let envelope = self
            .post(
                endpoints::GET_SESSION_RECORDING,
                json!({ "journey_id": journey_id, "event_id": event_id }),
            )
            .await?;

        if envelope.success && envelope.has("recording") {
            return envelope.take("recording");
        }

        if envelope.message.as_deref() == Some(NO_RECORDING_MESSAGE) {
            tracing::debug!("No recording for event {} in journey {}", event_id, journey_id);
            return Err(JourneyError::NotFound(NO_RECORDING_MESSAGE.to_string()).into());
        }

        let message = envelope
            .message
            .unwrap_or_else(|| "Failed to load recording".to_string());
        Err(JourneyError::DataUnavailable(message).into())
    }
}
