//! Scheduler layer for the runner
//!
//! Owns the repeating tracker refresh cycles. Every cycle is a cancellable
//! task handle held by whoever started it; nothing is scheduled globally.

pub mod poller;
pub mod task;

pub use poller::{PollerHandles, TrackerPoller};
pub use task::RepeatingTask;
