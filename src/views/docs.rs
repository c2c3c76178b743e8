//! Documentation view: steps, their events, and event parameters

use crate::fetcher::{JourneyDataFetcher, JourneyModel};
use crate::highlight::{HighlightOutcome, HighlightResolver};
use crate::model::JourneyStep;
use crate::service::JourneyService;
use crate::views::navigation::{self, NavigationAdapter, Route, ViewKind};
use crate::views::{ViewSlot, ViewState};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Loaded documentation for a journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsPage {
    pub model: JourneyModel,
    pub highlight: HighlightOutcome,
    /// Steps shown expanded on first render
    pub expanded_steps: Vec<String>,
    /// Replay links for events that carry a video, keyed by event id
    pub replay_routes: BTreeMap<String, Route>,
}

impl DocsPage {
    pub fn new(model: JourneyModel, highlight: HighlightOutcome) -> Self {
        let expanded_steps = highlight.expand_step().map(str::to_string).into_iter().collect();
        let mut replay_routes = BTreeMap::new();
        for (_, event) in model.configured_events() {
            if let (Some(id), Some(_)) = (event.id.as_deref(), event.video_url.as_ref()) {
                replay_routes.entry(id.to_string()).or_insert_with(|| {
                    Route::new(&model.journey_id, ViewKind::Replay).with_event(id)
                });
            }
        }

        Self {
            model,
            highlight,
            expanded_steps,
            replay_routes,
        }
    }

    /// "View Recording" link for an event, when it has a video
    pub fn replay_route(&self, event_id: &str) -> Option<&Route> {
        self.replay_routes.get(event_id)
    }

    pub fn is_expanded(&self, step_id: &str) -> bool {
        self.expanded_steps.iter().any(|id| id == step_id)
    }

    /// Expand or collapse a step
    pub fn toggle(&mut self, step_id: &str) {
        if let Some(index) = self.expanded_steps.iter().position(|id| id == step_id) {
            self.expanded_steps.remove(index);
        } else {
            self.expanded_steps.push(step_id.to_string());
        }
    }

    /// Steps matching the search box
    pub fn visible_steps(&self, query: Option<&str>) -> Vec<&JourneyStep> {
        self.model.search(query.unwrap_or_default())
    }
}

/// Event documentation browser for one journey
pub struct DocsView {
    fetcher: JourneyDataFetcher,
    slot: ViewSlot<DocsPage>,
}

impl DocsView {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self {
            fetcher: JourneyDataFetcher::new(service),
            slot: ViewSlot::new(),
        }
    }

    /// Fetch the journey and resolve the `event` highlight parameter
    pub async fn load(&self, nav: &dyn NavigationAdapter) -> ViewState<DocsPage> {
        let ticket = self.slot.begin();
        let request = nav.highlight();

        let result = match navigation::journey_id(nav) {
            Ok(journey_id) => self.fetcher.fetch_steps(&journey_id).await.map(|model| {
                let highlight = HighlightResolver::resolve(&model, &request);
                DocsPage::new(model, highlight)
            }),
            Err(e) => Err(e),
        };

        self.slot.settle(
            &ticket,
            ViewState::from_result(
                result,
                "Unable to load journey documentation. Please try again later.",
            ),
        );
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<DocsPage> {
        self.slot.state()
    }

    pub fn slot(&self) -> &ViewSlot<DocsPage> {
        &self.slot
    }
}
