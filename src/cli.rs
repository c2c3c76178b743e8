//! Command-line interface definition for Journeyscope
//!
//! This module defines the CLI structure using clap's derive API. Every
//! subcommand corresponds to one view of a journey.

use clap::{Parser, Subcommand};

/// Journeyscope - browse user journeys from the terminal
///
/// Lists an organization's journeys and renders each journey as a
/// flowchart, an event documentation browser, or a replay timeline.
#[derive(Parser, Debug, Clone)]
#[command(name = "journeyscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the journey service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Use this organization for the current invocation
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Journeyscope
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the user and remember their organization
    Login {
        /// External auth identifier; omit to fall back to the default organization
        #[arg(long)]
        auth0_id: Option<String>,
    },

    /// List the organization's journeys
    Journeys {
        /// Case-insensitive filter over name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Drop the cached list and fetch again
        #[arg(long)]
        refresh: bool,
    },

    /// Show the step flowchart of a journey
    Flowchart {
        /// Journey identifier
        journey_id: String,
    },

    /// Browse event documentation for a journey
    Docs {
        /// Journey identifier
        journey_id: String,

        /// Event to expand and highlight
        #[arg(short, long)]
        event: Option<String>,

        /// Case-insensitive filter over steps and events
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the replay timeline of a journey
    Replay {
        /// Journey identifier
        journey_id: String,

        /// Event whose recording should be selected
        #[arg(short, long)]
        event: Option<String>,
    },

    /// Show documentation for a single event
    Event {
        /// Journey identifier
        journey_id: String,

        /// Event identifier
        #[arg(short, long)]
        event: Option<String>,
    },

    /// Show the session recording attached to an event
    Recording {
        /// Journey identifier
        journey_id: String,

        /// Event identifier
        #[arg(short, long)]
        event: Option<String>,
    },

    /// Show previous/next journey navigation
    Nav {
        /// Journey identifier
        journey_id: String,
    },

    /// Open a view by path, e.g. /journey/abc/docs?event=e7
    Open {
        /// Route path or full URL
        target: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            base_url: None,
            org: None,
            json: false,
            verbose: false,
            command: Commands::Journeys {
                search: None,
                refresh: false,
            },
        }
    }
}
