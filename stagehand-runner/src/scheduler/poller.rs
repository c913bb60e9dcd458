//! Tracker poller
//!
//! Refreshes the donation total and the bid list from the tracker and
//! republishes them. A failed refresh is logged and leaves the previously
//! published value in place; the next tick is the retry.

use anyhow::{Context, Result};
use stagehand_core::domain::bid::Bid;
use stagehand_core::normalize_bids;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, error, info};

use crate::repository::TrackerRepository;
use crate::scheduler::task::RepeatingTask;
use crate::store::{Replicant, Replicants};

/// Polls the tracker and publishes totals and bids
pub struct TrackerPoller {
    repository: Arc<dyn TrackerRepository>,
    donation_total: Replicant<f64>,
    bids: Replicant<Vec<Bid>>,
}

/// Handles of the two refresh cycles. Dropping them stops polling.
#[derive(Debug)]
pub struct PollerHandles {
    pub total: RepeatingTask,
    pub bids: RepeatingTask,
}

impl PollerHandles {
    pub fn cancel(&self) {
        self.total.cancel();
        self.bids.cancel();
    }
}

impl TrackerPoller {
    /// Creates a new tracker poller
    pub fn new(repository: Arc<dyn TrackerRepository>, store: &Replicants) -> Self {
        Self {
            repository,
            donation_total: store.donation_total.clone(),
            bids: store.bids.clone(),
        }
    }

    /// Fetches and publishes the donation total
    ///
    /// The value is always stored; a change is only announced when it
    /// differs from the last published total.
    pub async fn refresh_total(&self) -> Result<f64> {
        let total = self
            .repository
            .fetch_total()
            .await
            .context("Failed to fetch donation total")?
            .amount();

        debug!("Got donation total: ${}", total);
        if self.donation_total.set(total) {
            info!("API donation total changed: ${}", total);
        }

        Ok(total)
    }

    /// Fetches, normalizes and publishes the open bids
    pub async fn refresh_bids(&self) -> Result<usize> {
        let raw = self
            .repository
            .fetch_bids()
            .await
            .context("Failed to fetch bids")?;

        let bids = normalize_bids(raw);
        let count = bids.len();
        debug!("Got {} bids", count);
        self.bids.set(bids);

        Ok(count)
    }

    /// Starts both refresh cycles: once now, then every `interval`
    pub fn start(self: Arc<Self>, interval: Duration) -> PollerHandles {
        info!("Starting tracker poller (interval: {:?})", interval);

        let poller = Arc::clone(&self);
        let total = RepeatingTask::spawn("donation total refresh", interval, move || {
            let poller = Arc::clone(&poller);
            async move {
                if let Err(e) = poller.refresh_total().await {
                    error!("Error updating donation total: {:#}", e);
                }
            }
        });

        let poller = self;
        let bids = RepeatingTask::spawn("bids refresh", interval, move || {
            let poller = Arc::clone(&poller);
            async move {
                if let Err(e) = poller.refresh_bids().await {
                    error!("Error updating bids: {:#}", e);
                }
            }
        });

        debug!("Scheduled {} and {}", total.name(), bids.name());
        PollerHandles { total, bids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use stagehand_core::domain::layout::default_layouts;
    use stagehand_core::dto::tracker::{EventTotal, RawBid};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves queued responses; an empty queue behaves like a dead tracker.
    #[derive(Default)]
    struct FakeTracker {
        totals: Mutex<VecDeque<Result<EventTotal>>>,
        bids: Mutex<VecDeque<Result<Vec<RawBid>>>>,
    }

    impl FakeTracker {
        fn with_total(self, value: serde_json::Value) -> Self {
            let total = serde_json::from_value(value).unwrap();
            self.totals.lock().unwrap().push_back(Ok(total));
            self
        }

        fn with_bids(self, value: serde_json::Value) -> Self {
            let bids = serde_json::from_value(value).unwrap();
            self.bids.lock().unwrap().push_back(Ok(bids));
            self
        }
    }

    #[async_trait]
    impl TrackerRepository for FakeTracker {
        async fn fetch_total(&self) -> Result<EventTotal> {
            self.totals
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("connection refused")))
        }

        async fn fetch_bids(&self) -> Result<Vec<RawBid>> {
            self.bids
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("connection refused")))
        }
    }

    fn setup(tracker: FakeTracker) -> (Replicants, Arc<TrackerPoller>) {
        let store = Replicants::new(default_layouts()).unwrap();
        let poller = Arc::new(TrackerPoller::new(Arc::new(tracker), &store));
        (store, poller)
    }

    fn war_with_options() -> serde_json::Value {
        json!([
            {"pk": 1, "fields": {"state": "OPENED", "name": "Name the file", "total": "85.00",
                "istarget": false, "allowuseroptions": true,
                "speedrun__endtime": "2024-01-07T18:00:00Z"}},
            {"pk": 2, "fields": {"state": "OPENED", "parent": 1, "name": "BEEF", "total": "10.00"}},
            {"pk": 3, "fields": {"state": "OPENED", "parent": 1, "name": "CAKE", "total": "75.00"}},
            {"pk": 4, "fields": {"state": "DENIED", "parent": 1, "name": "RUDE", "total": "0.00"}}
        ])
    }

    #[tokio::test]
    async fn test_refresh_total_publishes() {
        let tracker = FakeTracker::default().with_total(json!({"agg": {"amount": "1500.25"}}));
        let (store, poller) = setup(tracker);
        assert_eq!(poller.refresh_total().await.unwrap(), 1500.25);
        assert_eq!(store.donation_total.get(), 1500.25);
    }

    #[tokio::test]
    async fn test_refresh_total_failure_keeps_previous() {
        let tracker = FakeTracker::default().with_total(json!({"agg": {"amount": 42}}));
        let (store, poller) = setup(tracker);
        poller.refresh_total().await.unwrap();

        assert!(poller.refresh_total().await.is_err());
        assert_eq!(store.donation_total.get(), 42.0);
    }

    #[tokio::test]
    async fn test_refresh_total_announces_only_changes() {
        let tracker = FakeTracker::default()
            .with_total(json!({"agg": {"amount": 10}}))
            .with_total(json!({"agg": {"amount": 10}}))
            .with_total(json!({"agg": {"amount": 12}}));
        let (store, poller) = setup(tracker);
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        store.donation_total.on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..3 {
            poller.refresh_total().await.unwrap();
        }
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_total_missing_aggregate_is_zero() {
        let (store, poller) = setup(FakeTracker::default().with_total(json!({})));
        store.donation_total.set(5.0);
        assert_eq!(poller.refresh_total().await.unwrap(), 0.0);
        assert_eq!(store.donation_total.get(), 0.0);
    }

    #[tokio::test]
    async fn test_refresh_bids_publishes_normalized_tree() {
        let (store, poller) = setup(FakeTracker::default().with_bids(war_with_options()));
        assert_eq!(poller.refresh_bids().await.unwrap(), 1);

        let bids = store.bids.get();
        assert!(bids[0].is_war());
        let names: Vec<&str> = bids[0].options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["CAKE", "BEEF"]);
    }

    #[tokio::test]
    async fn test_refresh_bids_failure_keeps_previous() {
        let (store, poller) = setup(FakeTracker::default().with_bids(war_with_options()));
        poller.refresh_bids().await.unwrap();
        let before = store.bids.get();

        assert!(poller.refresh_bids().await.is_err());
        assert_eq!(store.bids.get(), before);
    }

    #[tokio::test]
    async fn test_start_refreshes_immediately() {
        let tracker = FakeTracker::default()
            .with_total(json!({"agg": {"amount": 99.5}}))
            .with_bids(war_with_options());
        let (store, poller) = setup(tracker);

        let handles = poller.start(Duration::from_secs(3600));
        tokio::time::timeout(Duration::from_secs(2), async {
            while store.donation_total.get() != 99.5 || store.bids.get().is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("first refresh did not happen");

        handles.cancel();
    }
}
