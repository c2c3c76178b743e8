//! Configuration management for Journeyscope
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{JourneyError, Result};
use crate::session::DEFAULT_ORG_ID;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Journeyscope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote journey service settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Journey index cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Session (organization) settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Remote journey service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://circuit-webapp-backend-ggcjf7emdtd2dfdw.northcentralus-01.azurewebsites.net"
        .to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("journeyscope/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Journey index cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched journey list stays fresh (seconds)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Organization used when no user context can be resolved
    #[serde(default = "default_org_id")]
    pub default_org_id: String,

    /// Optional override for the persisted session file
    #[serde(default)]
    pub state_file: Option<String>,
}

fn default_org_id() -> String {
    DEFAULT_ORG_ID.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_org_id: default_org_id(),
            state_file: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded configuration; a missing file yields defaults
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| JourneyError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("JOURNEYSCOPE_BASE_URL") {
            self.service.base_url = base_url;
        }

        if let Ok(org_id) = std::env::var("JOURNEYSCOPE_ORG_ID") {
            self.session.default_org_id = org_id;
        }

        if let Ok(timeout) = std::env::var("JOURNEYSCOPE_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.service.timeout_seconds = value,
                Err(_) => tracing::warn!(
                    "Ignoring invalid JOURNEYSCOPE_TIMEOUT_SECONDS value: {}",
                    timeout
                ),
            }
        }

        if let Ok(ttl) = std::env::var("JOURNEYSCOPE_CACHE_TTL_SECONDS") {
            match ttl.parse() {
                Ok(value) => self.cache.ttl_seconds = value,
                Err(_) => tracing::warn!(
                    "Ignoring invalid JOURNEYSCOPE_CACHE_TTL_SECONDS value: {}",
                    ttl
                ),
            }
        }

        if let Ok(state_file) = std::env::var("JOURNEYSCOPE_SESSION_FILE") {
            self.session.state_file = Some(state_file);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.service.base_url = base_url.clone();
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(
                JourneyError::Config("service.base_url cannot be empty".to_string()).into(),
            );
        }

        if url::Url::parse(&self.service.base_url).is_err() {
            return Err(JourneyError::Config(format!(
                "service.base_url is not a valid URL: {}",
                self.service.base_url
            ))
            .into());
        }

        if self.service.timeout_seconds == 0 {
            return Err(JourneyError::Config(
                "service.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.default_org_id.trim().is_empty() {
            return Err(JourneyError::Config(
                "session.default_org_id cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            cache: CacheConfig::default(),
            session: SessionConfig::default(),
        }
    }
}
