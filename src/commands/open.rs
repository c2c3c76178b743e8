//! `open` command: route a path or URL to its view

use crate::commands::{journey, App};
use crate::error::Result;
use crate::views::{UrlNavigation, ViewKind};

/// Open `/journey/{id}/{view}?event=...` or a full URL with that path
///
/// # Errors
///
/// Returns [`crate::error::JourneyError::Route`] for paths that are not a
/// journey view.
pub async fn open(app: &App, target: &str) -> Result<()> {
    let nav = UrlNavigation::parse(target)?;
    tracing::debug!("Opening {} view for {}", nav.view(), target);

    match nav.view() {
        ViewKind::Flowchart => journey::show_flowchart(app, &nav).await,
        ViewKind::Docs => journey::show_docs(app, &nav, None).await,
        ViewKind::Replay => journey::show_replay(app, &nav).await,
    }
}
