//! View layer
//!
//! Every screen is a fetch-then-render view. A view owns a [`ViewSlot`]
//! holding its [`ViewState`]; each load takes a [`MountTicket`] before
//! awaiting the service and only writes its result back if no newer load
//! (or unmount) happened in the meantime. Failures become view state and
//! never escape the view.

pub mod docs;
pub mod event_detail;
pub mod flowchart;
pub mod journeys;
pub mod navigation;
pub mod recording;
pub mod replay;

pub use docs::{DocsPage, DocsView};
pub use event_detail::EventDetailView;
pub use flowchart::{Flowchart, FlowchartView};
pub use journeys::{JourneyListView, JourneyNav, JourneyNavView, NavControl};
pub use navigation::{NavigationAdapter, Route, StaticNavigation, UrlNavigation, ViewKind};
pub use recording::{RecordingPage, RecordingView};
pub use replay::ReplayView;

use crate::error::error_kind;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Render state of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    /// A fetch is outstanding
    Loading,
    /// Data is available
    Ready(T),
    /// The fetch failed; the user may retry
    Failed { message: String },
    /// Nothing to show; retrying will not help
    Empty { message: String },
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Whether a retry control should be offered
    pub fn is_retryable(&self) -> bool {
        matches!(self, ViewState::Failed { .. })
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ViewState::Failed {
            message: message.into(),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        ViewState::Empty {
            message: message.into(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(value) => ViewState::Ready(f(value)),
            ViewState::Failed { message } => ViewState::Failed { message },
            ViewState::Empty { message } => ViewState::Empty { message },
        }
    }

    /// Convert a fetch result, replacing any error with a user-facing message
    pub fn from_result(result: crate::error::Result<T>, failure_message: &str) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => {
                tracing::error!("{}: {}", failure_message, e);
                ViewState::failed(failure_message)
            }
        }
    }

    /// Like [`ViewState::from_result`], but a not-found answer is empty
    pub fn from_lookup(
        result: crate::error::Result<T>,
        failure_message: &str,
        not_found_message: &str,
    ) -> Self {
        match result {
            Err(e) if error_kind(&e).is_some_and(|k| k.is_not_found()) => {
                tracing::debug!("{}", not_found_message);
                ViewState::empty(not_found_message)
            }
            other => Self::from_result(other, failure_message),
        }
    }
}

/// Tracks which load of a view is current
///
/// Cloning shares the same underlying counters.
#[derive(Debug, Clone)]
pub struct MountGuard {
    generation: Arc<AtomicU64>,
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MountGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load; any earlier ticket stops being current
    pub fn begin(&self) -> MountTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        MountTicket {
            generation,
            guard: self.clone(),
        }
    }

    /// Mark the view as gone; no outstanding ticket stays current
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

/// Captured at the start of a load and checked before applying its result
#[derive(Debug, Clone)]
pub struct MountTicket {
    generation: u64,
    guard: MountGuard,
}

impl MountTicket {
    /// True while this is the most recent load of a still-mounted view
    pub fn is_current(&self) -> bool {
        self.guard.is_mounted() && self.guard.generation.load(Ordering::SeqCst) == self.generation
    }
}

/// State holder shared by every view
#[derive(Debug)]
pub struct ViewSlot<T> {
    guard: MountGuard,
    state: RwLock<ViewState<T>>,
}

impl<T: Clone> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            guard: MountGuard::new(),
            state: RwLock::new(ViewState::Loading),
        }
    }

    /// Begin a load and show the loading state
    pub fn begin(&self) -> MountTicket {
        let ticket = self.guard.begin();
        self.write(ViewState::Loading);
        ticket
    }

    /// Apply a load's result if its ticket is still current
    ///
    /// Returns false when the result was discarded.
    pub fn settle(&self, ticket: &MountTicket, state: ViewState<T>) -> bool {
        if !ticket.is_current() {
            tracing::debug!("Discarding superseded view update");
            return false;
        }
        self.write(state);
        true
    }

    pub fn state(&self) -> ViewState<T> {
        self.state
            .read()
            .map(|state| state.clone())
            .unwrap_or(ViewState::Loading)
    }

    pub fn guard(&self) -> &MountGuard {
        &self.guard
    }

    pub fn unmount(&self) {
        self.guard.unmount();
    }

    fn write(&self, state: ViewState<T>) {
        if let Ok(mut current) = self.state.write() {
            *current = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JourneyError;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!first.is_current());
        assert!(second.is_current());

        assert!(slot.settle(&second, ViewState::Ready(2)));
        assert!(!slot.settle(&first, ViewState::Ready(1)));
        assert_eq!(slot.state(), ViewState::Ready(2));
    }

    #[test]
    fn test_unmount_discards_everything() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        let ticket = slot.begin();
        slot.unmount();

        assert!(!slot.settle(&ticket, ViewState::Ready(7)));
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_begin_resets_to_loading() {
        let slot: ViewSlot<u32> = ViewSlot::new();
        let ticket = slot.begin();
        slot.settle(&ticket, ViewState::Ready(1));
        slot.begin();
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_from_result_and_lookup() {
        let failed: ViewState<u32> = ViewState::from_result(
            Err(JourneyError::DataUnavailable("down".into()).into()),
            "Failed to load",
        );
        assert_eq!(failed, ViewState::failed("Failed to load"));
        assert!(failed.is_retryable());

        let empty: ViewState<u32> = ViewState::from_lookup(
            Err(JourneyError::NotFound("gone".into()).into()),
            "Failed to load",
            "Nothing here",
        );
        assert_eq!(empty, ViewState::empty("Nothing here"));
        assert!(!empty.is_retryable());

        let other: ViewState<u32> = ViewState::from_lookup(
            Err(JourneyError::DataUnavailable("down".into()).into()),
            "Failed to load",
            "Nothing here",
        );
        assert!(other.is_retryable());

        let ready: ViewState<u32> = ViewState::from_lookup(Ok(3), "x", "y");
        assert_eq!(ready.ready(), Some(&3));
    }
}
