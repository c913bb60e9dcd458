//! Bid domain types
//!
//! The normalized bid tree published to displays. A parent bid is either a
//! single donation target with a goal, or a bid war whose options are
//! child bids.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Tracker primary key of a bid.
pub type BidId = i64;

/// A top-level bid (target or war)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bid {
    pub id: BidId,
    pub name: String,
    pub total: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// End of the associated run, in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(flatten)]
    pub kind: BidKind,
}

/// Whether a parent bid is a target or a war
#[derive(Debug, Clone, PartialEq)]
pub enum BidKind {
    Target {
        goal: f64,
    },
    War {
        allow_user_options: bool,
        options: Vec<ChildBid>,
    },
}

/// One option of a bid war
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildBid {
    pub id: BidId,
    pub parent: BidId,
    pub name: String,
    pub total: f64,
}

impl Bid {
    pub fn is_war(&self) -> bool {
        matches!(self.kind, BidKind::War { .. })
    }

    /// Goal of a target bid. Wars have none.
    pub fn goal(&self) -> Option<f64> {
        match self.kind {
            BidKind::Target { goal } => Some(goal),
            BidKind::War { .. } => None,
        }
    }

    /// Options of a bid war. Targets have none.
    pub fn options(&self) -> &[ChildBid] {
        match &self.kind {
            BidKind::War { options, .. } => options,
            BidKind::Target { .. } => &[],
        }
    }
}

// Displays expect `war: true` on wars and a bare `goal` on targets.
impl Serialize for BidKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BidKind::Target { goal } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("goal", goal)?;
                map.end()
            }
            BidKind::War {
                allow_user_options,
                options,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("war", &true)?;
                map.serialize_entry("allow_user_options", allow_user_options)?;
                map.serialize_entry("options", options)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bid(kind: BidKind) -> Bid {
        Bid {
            id: 7,
            name: "Name the character".to_string(),
            total: 120.0,
            game: Some("Celeste".to_string()),
            category: None,
            description: None,
            end_time: Some(1_700_000_000_000),
            kind,
        }
    }

    #[test]
    fn test_target_serializes_with_goal_only() {
        let value = serde_json::to_value(bid(BidKind::Target { goal: 500.0 })).unwrap();
        assert_eq!(value["goal"], json!(500.0));
        assert!(value.get("war").is_none());
        assert!(value.get("options").is_none());
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_war_serializes_with_flag_and_options() {
        let war = bid(BidKind::War {
            allow_user_options: true,
            options: vec![ChildBid {
                id: 8,
                parent: 7,
                name: "Madeline".to_string(),
                total: 20.0,
            }],
        });
        let value = serde_json::to_value(&war).unwrap();
        assert_eq!(value["war"], json!(true));
        assert_eq!(value["allow_user_options"], json!(true));
        assert_eq!(value["options"][0]["parent"], json!(7));
        assert!(value.get("goal").is_none());
        assert!(war.is_war());
        assert_eq!(war.goal(), None);
    }
}
