//! Stagehand Core
//!
//! Core types and pure transforms for the Stagehand broadcast glue.
//!
//! This crate contains:
//! - Domain types: layouts, the active run, normalized bids
//! - DTOs: raw payloads returned by the donation tracker
//! - Normalization: reshaping raw tracker bids into the published bid tree

pub mod domain;
pub mod dto;
mod lenient;
pub mod normalize;

pub use normalize::{NormalizeError, normalize_bids, normalize_bids_json};
