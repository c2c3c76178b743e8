//! Session context: the active organization
//!
//! The organization is resolved once when the application starts and is
//! then passed explicitly to every data-access call. The resolved value is
//! persisted so later invocations reuse it without resolving the user again.

use crate::config::SessionConfig;
use crate::error::{JourneyError, Result};
use crate::service::JourneyService;

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Organization used when no user context can be resolved
pub const DEFAULT_ORG_ID: &str = "cd194f08-d52a-4ad2-a97a-0efaaebbb3ed";

/// Explicit organization context handed to every data-access call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub org_id: String,
    /// Resolved user, when bootstrap went through the user lookup
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn for_org(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            user_id: None,
        }
    }
}

/// File-backed store for the session context
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Open the store in the user's data directory
    ///
    /// `JOURNEYSCOPE_SESSION_FILE` overrides the location.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("JOURNEYSCOPE_SESSION_FILE") {
            return Ok(Self::new_with_path(override_path));
        }

        let proj_dirs = ProjectDirs::from("com", "journeyscope", "journeyscope")
            .ok_or_else(|| JourneyError::Session("Could not determine data directory".into()))?;

        Ok(Self::new_with_path(proj_dirs.data_dir().join("session.json")))
    }

    /// Open the store configured in `session.state_file`, or the default one
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        match &config.state_file {
            Some(path) => Ok(Self::new_with_path(path)),
            None => Self::new(),
        }
    }

    /// Open the store at an explicit path
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted context, if any
    ///
    /// A corrupt file is logged and treated as absent.
    pub fn load(&self) -> Result<Option<SessionContext>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;

        match serde_json::from_str(&contents) {
            Ok(context) => Ok(Some(context)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// Persist the context, creating parent directories as needed
    pub fn save(&self, context: &SessionContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create session directory")
                .map_err(|e| JourneyError::Session(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(context)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        Ok(())
    }
}

/// Establish the session at application start
///
/// With an auth identifier the user is resolved and their organization is
/// used; a failed lookup falls back to `fallback_org`. Without one, a
/// previously persisted context is reused, or `fallback_org` if there is
/// none. The chosen context is persisted either way.
pub async fn bootstrap(
    service: &dyn JourneyService,
    store: &SessionStore,
    auth0_id: Option<&str>,
    fallback_org: &str,
) -> Result<SessionContext> {
    let context = match auth0_id {
        Some(auth0_id) => match service.resolve_user(auth0_id).await {
            Ok(user) => {
                tracing::info!("Resolved user {} in organization {}", user.id, user.org_id);
                SessionContext {
                    org_id: user.org_id,
                    user_id: Some(user.id),
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to resolve user, using fallback organization {}: {}",
                    fallback_org,
                    e
                );
                SessionContext::for_org(fallback_org)
            }
        },
        None => match store.load()? {
            Some(existing) => {
                tracing::debug!("Reusing persisted organization {}", existing.org_id);
                existing
            }
            None => SessionContext::for_org(fallback_org),
        },
    };

    store.save(&context)?;
    Ok(context)
}

/// Session for a single command without touching the user lookup
///
/// An explicit organization wins; otherwise the persisted context, then the
/// fallback. Nothing is written.
pub fn current(
    store: &SessionStore,
    explicit_org: Option<&str>,
    fallback_org: &str,
) -> Result<SessionContext> {
    if let Some(org_id) = explicit_org {
        return Ok(SessionContext::for_org(org_id));
    }

    Ok(store
        .load()?
        .unwrap_or_else(|| SessionContext::for_org(fallback_org)))
}
