//! Core domain types
//!
//! These are the values published to downstream displays (layouts, bids)
//! plus the externally owned run record the layout selector reacts to.

pub mod bid;
pub mod layout;
pub mod run;
