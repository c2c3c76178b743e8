//! Session recording panel for a single event

use crate::model::SessionRecording;
use crate::replay::{recording_entries, RecordingEntry};
use crate::service::JourneyService;
use crate::views::navigation::{self, NavigationAdapter};
use crate::views::{ViewSlot, ViewState};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NO_SELECTION_MESSAGE: &str = "Select an event to view its session recording";
const NOT_FOUND_MESSAGE: &str = "No recording is available for this event.";
const FAILURE_MESSAGE: &str = "Unable to load the session recording. Please try again later.";

/// A recording with its events positioned from the start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingPage {
    pub recording: SessionRecording,
    pub entries: Vec<RecordingEntry>,
}

impl RecordingPage {
    pub fn new(recording: SessionRecording) -> Self {
        let entries = recording_entries(&recording);
        Self { recording, entries }
    }
}

pub struct RecordingView {
    service: Arc<dyn JourneyService>,
    slot: ViewSlot<RecordingPage>,
}

impl RecordingView {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self {
            service,
            slot: ViewSlot::new(),
        }
    }

    /// Load the recording for the selected event
    ///
    /// A missing recording is empty; any other failure can be retried.
    pub async fn load(&self, nav: &dyn NavigationAdapter) -> ViewState<RecordingPage> {
        let ticket = self.slot.begin();

        let Some(event_id) = nav.highlight().event_id().map(str::to_string) else {
            self.slot.settle(&ticket, ViewState::empty(NO_SELECTION_MESSAGE));
            return self.slot.state();
        };

        let result = match navigation::journey_id(nav) {
            Ok(journey_id) => {
                tracing::debug!("Fetching recording for {}/{}", journey_id, event_id);
                self.service
                    .session_recording(&journey_id, &event_id)
                    .await
                    .map(RecordingPage::new)
            }
            Err(e) => Err(e),
        };

        self.slot.settle(
            &ticket,
            ViewState::from_lookup(result, FAILURE_MESSAGE, NOT_FOUND_MESSAGE),
        );
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<RecordingPage> {
        self.slot.state()
    }

    pub fn slot(&self) -> &ViewSlot<RecordingPage> {
        &self.slot
    }
}
