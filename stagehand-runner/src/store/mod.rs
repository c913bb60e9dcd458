//! Replicant store
//!
//! Holds every value published to downstream displays, plus the active run
//! record the layout selector listens to. Each cell has a fixed name and a
//! defined default.

mod replicant;

pub use replicant::Replicant;

use anyhow::Result;
use serde_json::{Map, Value};
use stagehand_core::domain::bid::Bid;
use stagehand_core::domain::layout::LayoutDescriptor;
use stagehand_core::domain::run::ActiveRun;

pub const GAME_LAYOUTS: &str = "gameLayouts";
pub const CURRENT_GAME_LAYOUT: &str = "currentGameLayout";
pub const ACTIVE_RUN: &str = "runDataActiveRun";
pub const DONATION_TOTAL: &str = "donationTotal";
pub const BIDS: &str = "bids";

/// The process-wide set of replicants
#[derive(Debug, Clone)]
pub struct Replicants {
    pub game_layouts: Replicant<Vec<LayoutDescriptor>>,
    pub current_game_layout: Replicant<LayoutDescriptor>,
    pub active_run: Replicant<Option<ActiveRun>>,
    pub donation_total: Replicant<f64>,
    pub bids: Replicant<Vec<Bid>>,
}

impl Replicants {
    /// Creates the store. The current layout starts as a copy of the first
    /// entry of `layouts`.
    pub fn new(layouts: Vec<LayoutDescriptor>) -> Result<Self> {
        let Some(first) = layouts.first().cloned() else {
            anyhow::bail!("at least one layout must be configured");
        };

        Ok(Self {
            game_layouts: Replicant::new(GAME_LAYOUTS, layouts),
            current_game_layout: Replicant::new(CURRENT_GAME_LAYOUT, first),
            active_run: Replicant::new(ACTIVE_RUN, None),
            donation_total: Replicant::new(DONATION_TOTAL, 0.0),
            bids: Replicant::new(BIDS, Vec::new()),
        })
    }

    /// All current values keyed by replicant name
    pub fn snapshot(&self) -> Result<Value> {
        let mut values = Map::new();
        values.insert(
            self.game_layouts.name().to_string(),
            serde_json::to_value(self.game_layouts.get())?,
        );
        values.insert(
            self.current_game_layout.name().to_string(),
            serde_json::to_value(self.current_game_layout.get())?,
        );
        values.insert(
            self.active_run.name().to_string(),
            serde_json::to_value(self.active_run.get())?,
        );
        values.insert(
            self.donation_total.name().to_string(),
            Value::from(self.donation_total.get()),
        );
        values.insert(
            self.bids.name().to_string(),
            serde_json::to_value(self.bids.get())?,
        );
        Ok(Value::Object(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stagehand_core::domain::layout::default_layouts;

    #[test]
    fn test_defaults() {
        let store = Replicants::new(default_layouts()).unwrap();
        assert_eq!(store.game_layouts.get().len(), 10);
        assert_eq!(store.current_game_layout.get().code, "4_3");
        assert_eq!(store.active_run.get(), None);
        assert_eq!(store.donation_total.get(), 0.0);
        assert!(store.bids.get().is_empty());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(Replicants::new(Vec::new()).is_err());
    }

    #[test]
    fn test_snapshot_keys() {
        let store = Replicants::new(default_layouts()).unwrap();
        store.donation_total.set(250.5);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot[DONATION_TOTAL], json!(250.5));
        assert_eq!(snapshot[CURRENT_GAME_LAYOUT]["code"], json!("4_3"));
        assert_eq!(snapshot[ACTIVE_RUN], Value::Null);
        assert_eq!(snapshot[BIDS], json!([]));
        assert_eq!(snapshot[GAME_LAYOUTS].as_array().map(Vec::len), Some(10));
    }
}
