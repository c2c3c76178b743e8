//! Journey list and per-journey navigation
//!
//! Both views read the organization's journeys through the shared
//! [`JourneyIndexCache`], so opening the list and then a journey costs a
//! single list fetch.

use crate::index_cache::JourneyIndexCache;
use crate::model::{Journey, JourneyRef};
use crate::session::SessionContext;
use crate::views::navigation::{Route, ViewKind};
use crate::views::{ViewSlot, ViewState};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Searchable list of the organization's journeys
pub struct JourneyListView {
    cache: Arc<JourneyIndexCache>,
    slot: ViewSlot<Arc<Vec<Journey>>>,
}

impl JourneyListView {
    pub fn new(cache: Arc<JourneyIndexCache>) -> Self {
        Self {
            cache,
            slot: ViewSlot::new(),
        }
    }

    pub async fn load(&self, session: &SessionContext) -> ViewState<Arc<Vec<Journey>>> {
        let ticket = self.slot.begin();
        let result = self.cache.list(session).await;
        self.slot.settle(
            &ticket,
            ViewState::from_result(result, "Failed to load journeys"),
        );
        self.slot.state()
    }

    /// Drop the cached list and fetch again
    pub async fn retry(&self, session: &SessionContext) -> ViewState<Arc<Vec<Journey>>> {
        self.cache.invalidate(&session.org_id);
        self.load(session).await
    }

    /// Journeys whose name or description contains `query`
    pub fn filtered(&self, query: Option<&str>) -> Vec<Journey> {
        let state = self.slot.state();
        let Some(journeys) = state.ready() else {
            return Vec::new();
        };

        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => journeys.iter().filter(|j| j.matches(q)).cloned().collect(),
            None => journeys.to_vec(),
        }
    }

    pub fn state(&self) -> ViewState<Arc<Vec<Journey>>> {
        self.slot.state()
    }
}

/// Previous or next control in the journey header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavControl {
    pub target: Option<JourneyRef>,
    pub enabled: bool,
    pub route: Option<Route>,
}

impl NavControl {
    fn toward(target: Option<JourneyRef>, view: ViewKind) -> Self {
        let route = target.as_ref().map(|j| Route::new(&j.id, view));
        Self {
            enabled: target.is_some(),
            target,
            route,
        }
    }
}

/// Header of a journey page: name, prev/next, and view tabs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyNav {
    pub current: Option<JourneyRef>,
    pub previous: NavControl,
    pub next: NavControl,
    pub tabs: Vec<Route>,
}

pub struct JourneyNavView {
    cache: Arc<JourneyIndexCache>,
    slot: ViewSlot<JourneyNav>,
}

impl JourneyNavView {
    pub fn new(cache: Arc<JourneyIndexCache>) -> Self {
        Self {
            cache,
            slot: ViewSlot::new(),
        }
    }

    /// Build navigation for a journey shown in `view`
    ///
    /// Prev/next keep the current view so moving between journeys stays on
    /// the same tab.
    pub async fn load(
        &self,
        session: &SessionContext,
        journey_id: &str,
        view: ViewKind,
    ) -> ViewState<JourneyNav> {
        let ticket = self.slot.begin();

        let result = self
            .cache
            .neighbors(session, journey_id)
            .await
            .map(|neighbors| JourneyNav {
                current: neighbors.current,
                previous: NavControl::toward(neighbors.previous, view),
                next: NavControl::toward(neighbors.next, view),
                tabs: ViewKind::ALL
                    .into_iter()
                    .map(|kind| Route::new(journey_id, kind))
                    .collect(),
            });

        self.slot.settle(
            &ticket,
            ViewState::from_result(result, "Failed to load journey navigation"),
        );
        self.slot.state()
    }

    pub fn state(&self) -> ViewState<JourneyNav> {
        self.slot.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticJourneyService;
    use std::time::Duration;

    fn setup() -> (Arc<StaticJourneyService>, Arc<JourneyIndexCache>) {
        let service = Arc::new(
            StaticJourneyService::new()
                .with_journey("org", "j1", "Signup")
                .with_journey("org", "j2", "Checkout")
                .with_journey("org", "j3", "Referral"),
        );
        let cache = Arc::new(JourneyIndexCache::new(
            service.clone(),
            Duration::from_secs(300),
        ));
        (service, cache)
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let (_service, cache) = setup();
        let view = JourneyListView::new(cache);
        let session = SessionContext::for_org("org");

        assert_eq!(view.load(&session).await.ready().map(|j| j.len()), Some(3));
        let hits = view.filtered(Some("CHECK"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "j2");
        assert_eq!(view.filtered(Some("journey")).len(), 3);
        assert_eq!(view.filtered(None).len(), 3);
    }

    #[tokio::test]
    async fn test_failure_then_retry_refetches() {
        let (service, cache) = setup();
        let view = JourneyListView::new(cache);
        let session = SessionContext::for_org("org");

        service.fail("list_journeys");
        let state = view.load(&session).await;
        assert_eq!(state, ViewState::failed("Failed to load journeys"));
        assert!(view.filtered(None).is_empty());

        service.recover("list_journeys");
        assert!(view.retry(&session).await.ready().is_some());
        assert_eq!(service.calls("list_journeys"), 2);
    }

    #[tokio::test]
    async fn test_list_and_nav_share_one_fetch() {
        let (service, cache) = setup();
        let list = JourneyListView::new(cache.clone());
        let nav = JourneyNavView::new(cache);
        let session = SessionContext::for_org("org");

        list.load(&session).await;
        nav.load(&session, "j2", ViewKind::Docs).await;
        assert_eq!(service.calls("list_journeys"), 1);
    }

    #[tokio::test]
    async fn test_nav_controls_at_edges() {
        let (_service, cache) = setup();
        let view = JourneyNavView::new(cache);
        let session = SessionContext::for_org("org");

        let state = view.load(&session, "j1", ViewKind::Replay).await;
        let nav = state.ready().unwrap();
        assert!(!nav.previous.enabled);
        assert!(nav.previous.route.is_none());
        assert!(nav.next.enabled);
        assert_eq!(
            nav.next.route.as_ref().map(Route::to_path).as_deref(),
            Some("/journey/j2/replay")
        );
        assert_eq!(nav.tabs.len(), 3);
        assert_eq!(nav.current.as_ref().map(|j| j.name.as_str()), Some("Signup"));

        let state = view.load(&session, "j3", ViewKind::Flowchart).await;
        let nav = state.ready().unwrap();
        assert!(nav.previous.enabled);
        assert!(!nav.next.enabled);
    }

    #[tokio::test]
    async fn test_nav_failure() {
        let (service, cache) = setup();
        service.fail("list_journeys");
        let view = JourneyNavView::new(cache);

        let state = view
            .load(&SessionContext::for_org("org"), "j1", ViewKind::Docs)
            .await;
        assert_eq!(state, ViewState::failed("Failed to load journey navigation"));
    }
}
