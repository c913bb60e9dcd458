//! Stagehand Tracker Client
//!
//! A small, typed HTTP client for the donation tracker.
//!
//! The tracker keeps a session cookie, so one client instance is meant to be
//! reused across polls.
//!
//! # Example
//!
//! ```no_run
//! use stagehand_client::TrackerClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TrackerClient::new("https://tracker.example.org/tracker", "42")?;
//!
//!     let total = client.fetch_event_total().await?;
//!     println!("Raised so far: ${}", total.amount());
//!     Ok(())
//! }
//! ```

pub mod error;
mod tracker;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use stagehand_core::dto::tracker::{EventTotal, RawBid};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the donation tracker API
#[derive(Debug, Clone)]
pub struct TrackerClient {
    /// Base URL of the tracker (e.g., "https://tracker.example.org/tracker")
    base_url: String,
    /// Event the totals and bids are scoped to
    event_id: String,
    /// HTTP client instance
    client: Client,
}

impl TrackerClient {
    /// Create a new tracker client with a cookie-enabled HTTP client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the tracker
    /// * `event_id` - The tracker's identifier for the event
    pub fn new(base_url: impl Into<String>, event_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Self::with_client(base_url, event_id, client)
    }

    /// Create a new tracker client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// Enable the cookie store on it if the tracker session should persist.
    pub fn with_client(
        base_url: impl Into<String>,
        event_id: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let event_id = event_id.into();

        if event_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "event id cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            event_id,
            client,
        })
    }

    /// Get the base URL of the tracker
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the event id this client is scoped to
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a tracker response and deserialize JSON
    ///
    /// Only `200 OK` counts as success; anything else is reported with the
    /// response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
