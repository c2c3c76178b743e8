//! Journeyscope - user journey browser library
//!
//! Fetches an organization's user journeys from the journey service and
//! presents each one as a step flowchart, an event documentation browser,
//! or a replay timeline synchronized with a session video.
//!
//! # Architecture
//!
//! - `service`: the [`service::JourneyService`] trait, its HTTP client and an in-memory fake
//! - `model`: typed records returned by the service
//! - `fetcher`: fetch and normalize a journey's steps, events and parameters
//! - `highlight`: resolve the `event` parameter to a step to expand
//! - `index_cache`: organization-scoped journey list cache with prev/next lookup
//! - `replay`: video offsets and timeline projection
//! - `session`: organization context bootstrap and persistence
//! - `views`: fetch-then-render view state machines and navigation adapters
//! - `config`, `error`, `cli`, `commands`: the application shell
//!
//! # Example
//!
//! ```no_run
//! use journeyscope::{Config, HttpJourneyService};
//! use journeyscope::views::{FlowchartView, StaticNavigation};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let service = Arc::new(HttpJourneyService::new(&config.service)?);
//!     let view = FlowchartView::new(service);
//!     let state = view.load(&StaticNavigation::journey("journey-id", None)).await;
//!     println!("{:?}", state.ready().map(|chart| chart.nodes.len()));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod highlight;
pub mod index_cache;
pub mod model;
pub mod replay;
pub mod service;
pub mod session;
pub mod views;

// Re-export commonly used types
pub use config::Config;
pub use error::{JourneyError, Result};
pub use fetcher::{JourneyDataFetcher, JourneyModel};
pub use highlight::{HighlightOutcome, HighlightRequest, HighlightResolver};
pub use index_cache::{JourneyIndexCache, Neighbors};
pub use service::{HttpJourneyService, JourneyService, StaticJourneyService};
pub use session::{SessionContext, SessionStore};
pub use views::{ViewKind, ViewState};

#[cfg(test)]
pub mod test_utils;
