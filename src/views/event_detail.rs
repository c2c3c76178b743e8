//! Single-event documentation panel

use crate::fetcher::JourneyDataFetcher;
use crate::model::AnalyticsEvent;
use crate::service::JourneyService;
use crate::views::navigation::{self, NavigationAdapter};
use crate::views::{ViewSlot, ViewState};

use std::sync::Arc;

const NO_SELECTION_MESSAGE: &str = "Select an event from the flowchart to view its documentation";
const FAILURE_MESSAGE: &str = "Unable to load event documentation. Please try again later.";

/// Documentation for the event selected in the flowchart
pub struct EventDetailView {
    fetcher: JourneyDataFetcher,
    slot: ViewSlot<AnalyticsEvent>,
}

impl EventDetailView {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self {
            fetcher: JourneyDataFetcher::new(service),
            slot: ViewSlot::new(),
        }
    }

    /// Load the event named by the `event` parameter
    ///
    /// With no selection nothing is fetched.
    pub async fn load(&self, nav: &dyn NavigationAdapter) -> ViewState<AnalyticsEvent> {
        let ticket = self.slot.begin();

        let Some(event_id) = nav.highlight().event_id().map(str::to_string) else {
            self.slot.settle(&ticket, ViewState::empty(NO_SELECTION_MESSAGE));
            return self.slot.state();
        };

        let result = match navigation::journey_id(nav) {
            Ok(journey_id) => self.fetcher.fetch_event(&journey_id, &event_id).await,
            Err(e) => Err(e),
        };

        self.slot
            .settle(&ticket, ViewState::from_result(result, FAILURE_MESSAGE));
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<AnalyticsEvent> {
        self.slot.state()
    }

    pub fn slot(&self) -> &ViewSlot<AnalyticsEvent> {
        &self.slot
    }
}
