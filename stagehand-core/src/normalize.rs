//! Bid normalization
//!
//! Reshapes the tracker's flat list of bid records into the published tree:
//! parents (targets and wars) ordered by the end of their run, with war
//! options attached to their parent and ordered by total.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::bid::{Bid, BidId, BidKind, ChildBid};
use crate::dto::tracker::RawBid;

/// Errors raised while decoding a raw bid list
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Malformed bid list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A visible raw record, classified by whether it belongs to a parent.
#[derive(Debug, Clone, PartialEq)]
pub enum BidCandidate {
    Parent(Bid),
    Child(ChildBid),
}

impl BidCandidate {
    /// Classifies a raw record. Denied and pending records yield `None`.
    pub fn classify(raw: RawBid) -> Option<Self> {
        let fields = raw.fields;
        if !fields.state.is_visible() {
            return None;
        }

        if let Some(parent) = fields.parent {
            return Some(BidCandidate::Child(ChildBid {
                id: raw.pk,
                parent,
                name: fields.name,
                total: fields.total,
            }));
        }

        let kind = if fields.istarget {
            BidKind::Target { goal: fields.goal }
        } else {
            BidKind::War {
                allow_user_options: fields.allowuseroptions,
                options: Vec::new(),
            }
        };

        Some(BidCandidate::Parent(Bid {
            id: raw.pk,
            name: fields.name,
            total: fields.total,
            game: fields.run_name,
            category: fields.run_category,
            description: fields.shortdescription.or(fields.description),
            end_time: fields.run_end_time.as_deref().and_then(parse_end_time),
            kind,
        }))
    }
}

/// Normalizes raw tracker records into the ordered bid list.
///
/// Children whose parent is not among the visible parents are dropped.
/// Parents are ordered by `end_time`, earliest first; bids without an end
/// time come last and ties keep ascending id order.
pub fn normalize_bids(records: impl IntoIterator<Item = RawBid>) -> Vec<Bid> {
    let mut parents: BTreeMap<BidId, Bid> = BTreeMap::new();
    let mut children = Vec::new();

    for candidate in records.into_iter().filter_map(BidCandidate::classify) {
        match candidate {
            BidCandidate::Parent(bid) => {
                parents.insert(bid.id, bid);
            }
            BidCandidate::Child(child) => children.push(child),
        }
    }

    for child in children {
        if let Some(BidKind::War { options, .. }) =
            parents.get_mut(&child.parent).map(|bid| &mut bid.kind)
        {
            options.push(child);
        }
    }

    let mut bids: Vec<Bid> = parents.into_values().collect();
    for bid in &mut bids {
        if let BidKind::War { options, .. } = &mut bid.kind {
            options.sort_by(|a, b| b.total.total_cmp(&a.total));
        }
    }
    bids.sort_by_key(|bid| (bid.end_time.is_none(), bid.end_time));

    bids
}

/// Decodes a raw JSON array and normalizes it.
pub fn normalize_bids_json(value: serde_json::Value) -> Result<Vec<Bid>, NormalizeError> {
    let records: Vec<RawBid> = serde_json::from_value(value)?;
    Ok(normalize_bids(records))
}

/// Parses a run end time into epoch milliseconds.
///
/// Times without an offset are taken as UTC, date-only values as midnight UTC.
fn parse_end_time(raw: &str) -> Option<i64> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.timestamp_millis());
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
