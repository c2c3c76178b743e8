//! Journeyscope - user journey browser CLI
//!
#![doc = "Journeyscope - user journey browser CLI"]
#![doc = "Main entry point for the Journeyscope application."]

use anyhow::Result;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use journeyscope::cli::Cli;
use journeyscope::commands::{self, App};
use journeyscope::config::Config;
use journeyscope::service::HttpJourneyService;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    tracing::debug!("Using journey service at {}", config.service.base_url);
    let service = Arc::new(HttpJourneyService::new(&config.service)?);
    let app = App::new(config, service, &cli)?;

    commands::run(cli, app).await
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "journeyscope=debug"
    } else {
        "journeyscope=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
