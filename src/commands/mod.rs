/*!
Command handlers for the CLI

Each subcommand mounts one view, loads it, and prints the settled state
either as tables or, with `--json`, as the view state itself.

- `journeys`: organization journey list
- `journey`:  flowchart, docs, replay and navigation of one journey
- `event`:    single-event documentation and session recordings
- `login`:    session bootstrap
- `open`:     dispatch a route path to the matching view
*/

pub mod event;
pub mod journey;
pub mod journeys;
pub mod login;
pub mod open;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{JourneyError, Result};
use crate::index_cache::JourneyIndexCache;
use crate::service::JourneyService;
use crate::session::{self, SessionContext, SessionStore};
use crate::views::{StaticNavigation, ViewState};

use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs: the service, the shared index cache, and
/// the organization the invocation runs under
pub struct App {
    pub config: Config,
    pub service: Arc<dyn JourneyService>,
    pub cache: Arc<JourneyIndexCache>,
    pub store: SessionStore,
    pub json: bool,
    org_override: Option<String>,
}

impl App {
    /// # Errors
    ///
    /// Returns error if the session store location cannot be determined
    pub fn new(config: Config, service: Arc<dyn JourneyService>, cli: &Cli) -> Result<Self> {
        let store = SessionStore::from_config(&config.session)?;
        let cache = Arc::new(JourneyIndexCache::new(
            service.clone(),
            Duration::from_secs(config.cache.ttl_seconds),
        ));

        Ok(Self {
            config,
            service,
            cache,
            store,
            json: cli.json,
            org_override: cli.org.clone(),
        })
    }

    /// Organization for this invocation
    pub fn session(&self) -> Result<SessionContext> {
        let context = session::current(
            &self.store,
            self.org_override.as_deref(),
            &self.config.session.default_org_id,
        )?;
        tracing::debug!("Using organization {}", context.org_id);
        Ok(context)
    }
}

/// Execute a parsed command
pub async fn run(cli: Cli, app: App) -> Result<()> {
    match cli.command {
        Commands::Login { auth0_id } => login::login(&app, auth0_id.as_deref()).await,
        Commands::Journeys { search, refresh } => {
            journeys::list_journeys(&app, search.as_deref(), refresh).await
        }
        Commands::Flowchart { journey_id } => {
            journey::show_flowchart(&app, &StaticNavigation::journey(&journey_id, None)).await
        }
        Commands::Docs {
            journey_id,
            event,
            search,
        } => {
            let nav = StaticNavigation::journey(&journey_id, event.as_deref());
            journey::show_docs(&app, &nav, search.as_deref()).await
        }
        Commands::Replay { journey_id, event } => {
            let nav = StaticNavigation::journey(&journey_id, event.as_deref());
            journey::show_replay(&app, &nav).await
        }
        Commands::Event { journey_id, event } => {
            let nav = StaticNavigation::journey(&journey_id, event.as_deref());
            event::show_event(&app, &nav).await
        }
        Commands::Recording { journey_id, event } => {
            let nav = StaticNavigation::journey(&journey_id, event.as_deref());
            event::show_recording(&app, &nav).await
        }
        Commands::Nav { journey_id } => journey::show_nav(&app, &journey_id).await,
        Commands::Open { target } => open::open(&app, &target).await,
    }
}

/// Print any serializable value as pretty JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(JourneyError::Serialization)?;
    println!("{}", json);
    Ok(())
}

/// Report a view's non-ready state
///
/// Returns the ready value for rendering. Empty states print their message
/// and yield `None`. A failed state prints a retry hint and becomes an error
/// so the process exits non-zero.
pub(crate) fn settled<T>(state: &ViewState<T>) -> Result<Option<&T>> {
    match state {
        ViewState::Ready(value) => Ok(Some(value)),
        ViewState::Empty { message } => {
            println!("{}", message.yellow());
            Ok(None)
        }
        ViewState::Failed { message } => {
            eprintln!("{}", message.red());
            eprintln!("{} {}", "Try again:".dimmed(), retry_command());
            Err(JourneyError::DataUnavailable(message.clone()).into())
        }
        ViewState::Loading => Ok(None),
    }
}

/// The current invocation, for the retry hint
fn retry_command() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}

/// Exit status for a view printed as JSON
pub(crate) fn json_outcome<T>(state: &ViewState<T>) -> Result<()> {
    match state {
        ViewState::Failed { message } => Err(JourneyError::DataUnavailable(message.clone()).into()),
        _ => Ok(()),
    }
}

/// Trim long free text for table cells
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
