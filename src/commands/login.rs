//! `login` command: resolve the user and persist their organization

use crate::commands::{print_json, App};
use crate::error::Result;
use crate::session;

use colored::Colorize;

/// Bootstrap the session and remember it for later invocations
///
/// A failed user lookup is not an error; the default organization is used
/// and the command still succeeds.
pub async fn login(app: &App, auth0_id: Option<&str>) -> Result<()> {
    let fallback = app
        .org_override
        .clone()
        .unwrap_or_else(|| app.config.session.default_org_id.clone());

    let context = session::bootstrap(app.service.as_ref(), &app.store, auth0_id, &fallback).await?;
    app.cache.invalidate(&context.org_id);

    if app.json {
        return print_json(&context);
    }

    println!("{} {}", "Organization:".bold(), context.org_id);
    match &context.user_id {
        Some(user_id) => println!("{} {}", "User:".bold(), user_id),
        None => println!("{}", "No user resolved; using the default organization.".dimmed()),
    }
    println!("Session saved to {}", app.store.path().display());
    Ok(())
}
