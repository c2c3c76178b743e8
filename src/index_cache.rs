//! Organization-scoped journey index cache
//!
//! Navigation components (journey list, sidebar, prev/next) all need the
//! same list of an organization's journeys. [`JourneyIndexCache`] fetches it
//! once per organization and serves it until the entry goes stale or is
//! invalidated. Entries are replaced wholesale, never edited in place.

use crate::error::Result;
use crate::model::{Journey, JourneyRef};
use crate::service::JourneyService;
use crate::session::SessionContext;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Previous and next journeys around the current one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub current: Option<JourneyRef>,
    pub previous: Option<JourneyRef>,
    pub next: Option<JourneyRef>,
}

struct CachedIndex {
    journeys: Arc<Vec<Journey>>,
    fetched_at: Instant,
}

/// Process-wide cache of journey lists keyed by organization
pub struct JourneyIndexCache {
    service: Arc<dyn JourneyService>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedIndex>>,
    /// Held while a list fetch is in flight
    fetch_lock: Mutex<()>,
}

impl JourneyIndexCache {
    /// Create a cache whose entries stay fresh for `ttl`
    pub fn new(service: Arc<dyn JourneyService>, ttl: Duration) -> Self {
        Self {
            service,
            ttl,
            entries: RwLock::new(HashMap::new()),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Journeys of the session's organization
    ///
    /// Serves the cached list while fresh; otherwise fetches, transforms and
    /// caches a new one. Concurrent callers that miss together wait for a
    /// single fetch. A failed fetch leaves any previous entry untouched.
    pub async fn list(&self, session: &SessionContext) -> Result<Arc<Vec<Journey>>> {
        let org_id = session.org_id.as_str();

        if let Some(journeys) = self.cached(org_id) {
            tracing::debug!("Using cached journey list for organization {}", org_id);
            return Ok(journeys);
        }

        let _fetching = self.fetch_lock.lock().await;
        if let Some(journeys) = self.cached(org_id) {
            tracing::debug!("Journey list for organization {} fetched meanwhile", org_id);
            return Ok(journeys);
        }

        tracing::debug!("Fetching journey list for organization {}", org_id);
        let records = self.service.list_journeys(org_id).await?;
        let fetched_at = Utc::now();
        let journeys: Arc<Vec<Journey>> = Arc::new(
            records
                .into_iter()
                .map(|record| Journey::from_record(record, fetched_at))
                .collect(),
        );

        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                org_id.to_string(),
                CachedIndex {
                    journeys: journeys.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(journeys)
    }

    /// Zero-based index of a journey in the organization's list
    pub async fn position(
        &self,
        session: &SessionContext,
        journey_id: &str,
    ) -> Result<Option<usize>> {
        let journeys = self.list(session).await?;
        Ok(journeys.iter().position(|j| j.id == journey_id))
    }

    /// Adjacent journeys for prev/next navigation
    ///
    /// A journey that is not in the list has no current entry and no
    /// neighbors.
    pub async fn neighbors(&self, session: &SessionContext, journey_id: &str) -> Result<Neighbors> {
        let journeys = self.list(session).await?;
        let Some(index) = journeys.iter().position(|j| j.id == journey_id) else {
            tracing::debug!(
                "Journey {} not in organization {} index",
                journey_id,
                session.org_id
            );
            return Ok(Neighbors::default());
        };

        Ok(Neighbors {
            current: Some(journeys[index].to_ref()),
            previous: index
                .checked_sub(1)
                .and_then(|i| journeys.get(i))
                .map(Journey::to_ref),
            next: journeys.get(index + 1).map(Journey::to_ref),
        })
    }

    /// Drop an organization's entry so the next `list` fetches again
    pub fn invalidate(&self, org_id: &str) {
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(org_id).is_some() {
                tracing::debug!("Journey index for organization {} invalidated", org_id);
            }
        }
    }

    fn cached(&self, org_id: &str) -> Option<Arc<Vec<Journey>>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(org_id)?;
        self.is_fresh(entry.fetched_at)
            .then(|| entry.journeys.clone())
    }

    fn is_fresh(&self, fetched_at: Instant) -> bool {
        fetched_at.elapsed() < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticJourneyService;

    fn service() -> Arc<StaticJourneyService> {
        Arc::new(
            StaticJourneyService::new()
                .with_journey("org-a", "j1", "Signup")
                .with_journey("org-a", "j2", "Checkout")
                .with_journey("org-a", "j3", "Referral")
                .with_journey("org-b", "k1", "Billing"),
        )
    }

    fn cache(service: Arc<StaticJourneyService>, ttl: Duration) -> JourneyIndexCache {
        JourneyIndexCache::new(service, ttl)
    }

    #[tokio::test]
    async fn test_list_fetches_once_while_fresh() {
        let service = service();
        let cache = cache(service.clone(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        let first = cache.list(&session).await.unwrap();
        let second = cache.list(&session).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(first[0].tags, vec!["0 steps".to_string()]);
        assert_eq!(service.calls("list_journeys"), 1);
    }

    #[tokio::test]
    async fn test_entries_are_scoped_by_org() {
        let service = service();
        let cache = cache(service.clone(), Duration::from_secs(300));

        let a = cache.list(&SessionContext::for_org("org-a")).await.unwrap();
        let b = cache.list(&SessionContext::for_org("org-b")).await.unwrap();

        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 1);
        assert_eq!(service.calls("list_journeys"), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let service = service();
        let cache = cache(service.clone(), Duration::ZERO);
        let session = SessionContext::for_org("org-a");

        cache.list(&session).await.unwrap();
        cache.list(&session).await.unwrap();
        assert_eq!(service.calls("list_journeys"), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let service = service();
        let cache = cache(service.clone(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        cache.list(&session).await.unwrap();
        cache.invalidate("org-a");
        cache.list(&session).await.unwrap();
        assert_eq!(service.calls("list_journeys"), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let service = service();
        let cache = cache(service.clone(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        service.fail("list_journeys");
        assert!(cache.list(&session).await.is_err());

        service.recover("list_journeys");
        assert_eq!(cache.list(&session).await.unwrap().len(), 3);
        assert_eq!(service.calls("list_journeys"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let service = service();
        let cache = cache(service.clone(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        let (a, b) = tokio::join!(cache.list(&session), cache.list(&session));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(service.calls("list_journeys"), 1);
    }

    #[tokio::test]
    async fn test_position() {
        let cache = cache(service(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        assert_eq!(cache.position(&session, "j1").await.unwrap(), Some(0));
        assert_eq!(cache.position(&session, "j3").await.unwrap(), Some(2));
        assert_eq!(cache.position(&session, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_neighbors_at_edges() {
        let cache = cache(service(), Duration::from_secs(300));
        let session = SessionContext::for_org("org-a");

        let first = cache.neighbors(&session, "j1").await.unwrap();
        assert!(first.previous.is_none());
        assert_eq!(first.next.as_ref().map(|j| j.id.as_str()), Some("j2"));

        let middle = cache.neighbors(&session, "j2").await.unwrap();
        assert_eq!(middle.previous.as_ref().map(|j| j.name.as_str()), Some("Signup"));
        assert_eq!(middle.next.as_ref().map(|j| j.name.as_str()), Some("Referral"));
        assert_eq!(middle.current.as_ref().map(|j| j.id.as_str()), Some("j2"));

        let last = cache.neighbors(&session, "j3").await.unwrap();
        assert_eq!(last.previous.as_ref().map(|j| j.id.as_str()), Some("j2"));
        assert!(last.next.is_none());
    }

    #[tokio::test]
    async fn test_neighbors_single_and_unknown() {
        let cache = cache(service(), Duration::from_secs(300));

        let only = cache
            .neighbors(&SessionContext::for_org("org-b"), "k1")
            .await
            .unwrap();
        assert!(only.previous.is_none() && only.next.is_none());
        assert!(only.current.is_some());

        let unknown = cache
            .neighbors(&SessionContext::for_org("org-a"), "ghost")
            .await
            .unwrap();
        assert_eq!(unknown, Neighbors::default());
    }
}
