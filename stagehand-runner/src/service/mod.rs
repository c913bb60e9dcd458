//! Service layer
//!
//! Services contain the business logic of the runner. They read and write
//! replicants and never fail the process: errors are logged and handed back
//! to the caller.

mod layout;

// Re-export traits
pub use layout::LayoutService;

// Re-export implementations
pub use layout::{
    Completion, LayoutError, ReplicantLayoutService, RunLayoutOutcome, follow_active_run,
};
