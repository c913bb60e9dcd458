//! Repository layer
//!
//! Repositories are stateless wrappers around the tracker HTTP API. They
//! return raw tracker payloads without any business logic.
//!
//! Repositories are trait-based so the poller can be tested without a
//! network.

mod tracker;

// Re-export traits
pub use tracker::TrackerRepository;

// Re-export implementations
pub use tracker::HttpTrackerRepository;
