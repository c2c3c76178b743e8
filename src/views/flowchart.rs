//! Flowchart view: one node per step, linked in order
//!
//! Each node lists its configured events with links into the docs view
//! and, for events with a video, the replay view. Those links carry the
//! `event` parameter that the target view highlights.

use crate::fetcher::{JourneyDataFetcher, JourneyModel};
use crate::service::JourneyService;
use crate::views::navigation::{self, NavigationAdapter, Route, ViewKind};
use crate::views::{ViewSlot, ViewState};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NODE_X: f64 = 250.0;
const MIN_SPACING: f64 = 80.0;
const MAX_SPACING: f64 = 120.0;
const LAYOUT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Event listed on a step node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEvent {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub docs: Route,
    pub replay: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub order: i64,
    pub position: Position,
    pub events: Vec<NodeEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Laid-out journey graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flowchart {
    pub journey_id: String,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// Vertical distance between consecutive nodes
pub fn vertical_spacing(step_count: usize) -> f64 {
    if step_count == 0 {
        return MAX_SPACING;
    }
    (LAYOUT_HEIGHT / step_count as f64).clamp(MIN_SPACING, MAX_SPACING)
}

/// Lay out a normalized journey top to bottom
pub fn layout(model: &JourneyModel) -> Flowchart {
    let spacing = vertical_spacing(model.steps.len());

    let nodes = model
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| FlowNode {
            id: step.id.clone(),
            label: step.display_name().to_string(),
            order: step.order_key(),
            position: Position {
                x: NODE_X,
                y: index as f64 * spacing,
            },
            events: step
                .configured_events()
                .filter_map(|event| {
                    let id = event.id.clone()?;
                    Some(NodeEvent {
                        name: event.display_name().to_string(),
                        status: event.status.clone(),
                        docs: Route::new(&model.journey_id, ViewKind::Docs).with_event(&id),
                        replay: event.video_url.as_ref().map(|_| {
                            Route::new(&model.journey_id, ViewKind::Replay).with_event(&id)
                        }),
                        id,
                    })
                })
                .collect(),
        })
        .collect();

    let edges = model
        .steps
        .windows(2)
        .map(|pair| FlowEdge {
            id: format!("e{}-{}", pair[0].id, pair[1].id),
            source: pair[0].id.clone(),
            target: pair[1].id.clone(),
        })
        .collect();

    Flowchart {
        journey_id: model.journey_id.clone(),
        nodes,
        edges,
    }
}

/// Flowchart of one journey
pub struct FlowchartView {
    fetcher: JourneyDataFetcher,
    slot: ViewSlot<Flowchart>,
}

impl FlowchartView {
    pub fn new(service: Arc<dyn JourneyService>) -> Self {
        Self {
            fetcher: JourneyDataFetcher::new(service),
            slot: ViewSlot::new(),
        }
    }

    /// Fetch the journey named by the navigation and lay it out
    pub async fn load(&self, nav: &dyn NavigationAdapter) -> ViewState<Flowchart> {
        let ticket = self.slot.begin();

        let result = match navigation::journey_id(nav) {
            Ok(journey_id) => self.fetcher.fetch_steps(&journey_id).await.map(|m| layout(&m)),
            Err(e) => Err(e),
        };

        self.slot.settle(
            &ticket,
            ViewState::from_result(result, "Failed to load flowchart"),
        );
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<Flowchart> {
        self.slot.state()
    }

    pub fn slot(&self) -> &ViewSlot<Flowchart> {
        &self.slot
    }
}
