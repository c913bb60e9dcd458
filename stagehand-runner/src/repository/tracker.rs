//! Tracker repository
//!
//! Handles communication with the donation tracker:
//! - Fetching the event's aggregate donation total
//! - Fetching every open bid of the event

use anyhow::{Context, Result};
use async_trait::async_trait;
use stagehand_client::TrackerClient;
use stagehand_core::dto::tracker::{EventTotal, RawBid};

/// Repository trait for tracker reads
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// Fetches the event summary holding the donation aggregate
    async fn fetch_total(&self) -> Result<EventTotal>;

    /// Fetches all open bids, parents and options alike
    async fn fetch_bids(&self) -> Result<Vec<RawBid>>;
}

/// HTTP implementation of TrackerRepository
pub struct HttpTrackerRepository {
    client: TrackerClient,
}

impl HttpTrackerRepository {
    /// Creates a new HTTP tracker repository
    ///
    /// # Arguments
    /// * `client` - Tracker client; its cookie store is shared by both reads
    pub fn new(client: TrackerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TrackerRepository for HttpTrackerRepository {
    async fn fetch_total(&self) -> Result<EventTotal> {
        self.client
            .fetch_event_total()
            .await
            .with_context(|| format!("Failed to fetch {}", self.client.event_total_url()))
    }

    async fn fetch_bids(&self) -> Result<Vec<RawBid>> {
        self.client
            .fetch_open_bids()
            .await
            .with_context(|| format!("Failed to fetch {}", self.client.open_bids_url()))
    }
}
