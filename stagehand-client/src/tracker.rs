//! Tracker API endpoints

use stagehand_core::dto::tracker::{EventTotal, RawBid};

use crate::TrackerClient;
use crate::error::Result;

impl TrackerClient {
    // =============================================================================
    // Event Totals
    // =============================================================================

    /// URL of the event summary, which carries the donation aggregate
    pub fn event_total_url(&self) -> String {
        format!("{}/{}?json", self.base_url, self.event_id)
    }

    /// Fetch the aggregate donation total for the event
    ///
    /// # Example
    /// ```no_run
    /// # use stagehand_client::TrackerClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = TrackerClient::new("https://tracker.example.org/tracker", "42")?;
    /// let total = client.fetch_event_total().await?;
    /// println!("{}", total.amount());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_event_total(&self) -> Result<EventTotal> {
        let url = self.event_total_url();
        tracing::debug!("Fetching donation total from URL: {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Bids
    // =============================================================================

    /// URL of the search listing all open bids of the event
    pub fn open_bids_url(&self) -> String {
        format!(
            "{}/search?event={}&type=allbids&state=OPENED",
            self.base_url, self.event_id
        )
    }

    /// Fetch every open bid of the event, parents and options alike
    pub async fn fetch_open_bids(&self) -> Result<Vec<RawBid>> {
        let url = self.open_bids_url();
        tracing::debug!("Fetching bids from URL: {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
