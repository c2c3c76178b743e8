//! Cross-view event highlighting
//!
//! A view opened with an `event` navigation parameter expands the step that
//! owns the event, marks the event, and scrolls it into view once the first
//! render settles. A requested event that no longer exists is ignored.

use crate::fetcher::JourneyModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Navigation parameter carrying the highlight request
pub const EVENT_QUERY_PARAM: &str = "event";

/// Settle time before the scroll directive fires
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// The event a view was asked to highlight, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRequest {
    pub event_id: Option<String>,
}

impl HighlightRequest {
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from a raw parameter; only the empty string counts as absent
    pub fn from_param(value: Option<&str>) -> Self {
        Self {
            event_id: value.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }
}

/// One-shot scroll-into-view instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollDirective {
    /// Rendered anchor of the target event
    pub anchor: String,
    /// Delay after the initial render
    pub delay: Duration,
}

impl ScrollDirective {
    pub fn for_event(event_id: &str) -> Self {
        Self {
            anchor: event_anchor(event_id),
            delay: SCROLL_SETTLE_DELAY,
        }
    }
}

/// Anchor identifier an event is rendered under
pub fn event_anchor(event_id: &str) -> String {
    format!("event-{}", event_id)
}

/// What a view should do about a highlight request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HighlightOutcome {
    /// Nothing was requested
    None,
    /// The requested event was found
    Resolved {
        expand_step: String,
        highlight_event: String,
        scroll: ScrollDirective,
    },
    /// The requested event is not in the data; nothing is expanded
    Stale { requested: String },
}

impl HighlightOutcome {
    /// Step to auto-expand, if any
    pub fn expand_step(&self) -> Option<&str> {
        match self {
            HighlightOutcome::Resolved { expand_step, .. } => Some(expand_step),
            _ => None,
        }
    }

    /// Event to mark, if any
    pub fn highlight_event(&self) -> Option<&str> {
        match self {
            HighlightOutcome::Resolved {
                highlight_event, ..
            } => Some(highlight_event),
            _ => None,
        }
    }

    pub fn scroll(&self) -> Option<&ScrollDirective> {
        match self {
            HighlightOutcome::Resolved { scroll, .. } => Some(scroll),
            _ => None,
        }
    }

    pub fn is_marked(&self, event_id: &str) -> bool {
        self.highlight_event() == Some(event_id)
    }
}

/// Resolves highlight requests against a normalized journey
pub struct HighlightResolver;

impl HighlightResolver {
    /// Locate the step owning the requested event
    ///
    /// Steps are scanned in sorted order and the first step with a
    /// configured event of exactly that id wins. Placeholders never match.
    pub fn resolve(model: &JourneyModel, request: &HighlightRequest) -> HighlightOutcome {
        let Some(requested) = request.event_id() else {
            return HighlightOutcome::None;
        };

        match model.find_event(requested) {
            Some((step, _)) => {
                tracing::debug!("Highlighting event {} in step {}", requested, step.id);
                HighlightOutcome::Resolved {
                    expand_step: step.id.clone(),
                    highlight_event: requested.to_string(),
                    scroll: ScrollDirective::for_event(requested),
                }
            }
            None => {
                tracing::debug!(
                    "Requested event {} not found in journey {}",
                    requested,
                    model.journey_id
                );
                HighlightOutcome::Stale {
                    requested: requested.to_string(),
                }
            }
        }
    }
}
