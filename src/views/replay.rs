//! Replay view: session video with the journey's events on its timeline

use crate::fetcher::JourneyDataFetcher;
use crate::replay::{build_timeline, ReplayTimeline};
use crate::service::JourneyService;
use crate::views::navigation::{self, NavigationAdapter};
use crate::views::{ViewSlot, ViewState};

use std::sync::Arc;

const NO_VIDEO_MESSAGE: &str = "There is no recording available for this journey.";

pub struct ReplayView {
    fetcher: JourneyDataFetcher,
    slot: ViewSlot<ReplayTimeline>,
}

impl ReplayView {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self {
            fetcher: JourneyDataFetcher::new(service),
            slot: ViewSlot::new(),
        }
    }

    /// Fetch the journey and project its events onto the session video
    ///
    /// A journey whose events carry no video URL is empty, not failed.
    pub async fn load(&self, nav: &dyn NavigationAdapter) -> ViewState<ReplayTimeline> {
        let ticket = self.slot.begin();
        let request = nav.highlight();

        let result = match navigation::journey_id(nav) {
            Ok(journey_id) => self
                .fetcher
                .fetch_steps(&journey_id)
                .await
                .map(|model| build_timeline(&model, &request)),
            Err(e) => Err(e),
        };

        let state = match ViewState::from_result(result, "Failed to load replay") {
            ViewState::Ready(timeline) if !timeline.has_video() => {
                ViewState::empty(NO_VIDEO_MESSAGE)
            }
            other => other,
        };

        self.slot.settle(&ticket, state);
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<ReplayTimeline> {
        self.slot.state()
    }

    pub fn slot(&self) -> &ViewSlot<ReplayTimeline> {
        &self.slot
    }
}
