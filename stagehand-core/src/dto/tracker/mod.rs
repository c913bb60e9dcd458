//! Tracker DTOs
//!
//! Raw responses of the donation tracker's event and search endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::bid::BidId;
use crate::lenient;

/// Response of `<tracker>/<event>?json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTotal {
    #[serde(default)]
    pub agg: Option<EventAggregate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAggregate {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub count: f64,
}

impl EventTotal {
    /// Aggregate donation amount, 0.0 when the tracker omits it.
    pub fn amount(&self) -> f64 {
        self.agg.as_ref().map(|agg| agg.amount).unwrap_or(0.0)
    }
}

/// Moderation state of a bid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BidState {
    Opened,
    Closed,
    Hidden,
    Denied,
    Pending,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BidState {
    /// Denied and pending bids are never shown.
    pub fn is_visible(self) -> bool {
        !matches!(self, BidState::Denied | BidState::Pending)
    }
}

/// One entry of `<tracker>/search?type=allbids`
#[derive(Debug, Clone, Deserialize)]
pub struct RawBid {
    pub pk: BidId,
    pub fields: RawBidFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBidFields {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub state: BidState,

    #[serde(default)]
    pub parent: Option<BidId>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total: f64,

    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub shortdescription: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub istarget: bool,

    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub goal: f64,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub allowuseroptions: bool,

    #[serde(rename = "speedrun__name", default)]
    pub run_name: Option<String>,

    #[serde(rename = "speedrun__category", default)]
    pub run_category: Option<String>,

    #[serde(rename = "speedrun__endtime", default)]
    pub run_end_time: Option<String>,
}
