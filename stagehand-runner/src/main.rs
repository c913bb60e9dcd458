//! Stagehand Runner
//!
//! Broadcast-control glue for a marathon stream.
//!
//! Architecture:
//! - Configuration: Load settings from the environment
//! - Store: Replicants published to downstream displays
//! - Services: Layout selection driven by commands and the active run
//! - Repositories: HTTP reads from the donation tracker
//! - Scheduler: Repeating refresh of the donation total and open bids
//!
//! Operator commands are read from stdin, one per line.

mod app;
mod command;
mod config;
mod repository;
mod scheduler;
mod service;
mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::Stagehand;
use crate::command::spawn_stdin_reader;
use crate::config::Config;
use crate::repository::HttpTrackerRepository;
use stagehand_client::TrackerClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stagehand_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stagehand");

    // Load configuration
    let config = load_config()?;

    let mut app = Stagehand::new(&config)?;

    // The tracker is optional when only layout switching is wanted
    if config.tracker.enable {
        info!(
            "Tracker enabled: url={}, event_id={}",
            config.tracker.url, config.tracker.event_id
        );
        let client = TrackerClient::new(config.tracker.url.clone(), config.tracker.event_id.clone())
            .context("Failed to create tracker client")?;
        let repository = Arc::new(HttpTrackerRepository::new(client));
        app.start_tracker(repository, config.tracker.refresh_interval);
    } else {
        info!("Tracker disabled, only layout switching is active");
    }

    let (tx, rx) = mpsc::channel(32);
    let _reader = spawn_stdin_reader(tx);

    info!("Ready for commands");
    app.run(rx).await?;

    info!("Stagehand stopped");
    Ok(())
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
