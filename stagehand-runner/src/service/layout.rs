//! Layout service
//!
//! Keeps `currentGameLayout` in sync with operator commands and with the
//! layout requested by the active run. Lookup failures are logged and
//! reported back to the caller; the previous layout always stays in place.

use std::sync::Arc;

use stagehand_core::domain::layout::{LayoutDescriptor, find_layout};
use stagehand_core::domain::run::ActiveRun;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::store::{Replicant, Replicants};

/// Callback run after a layout change has been applied
pub type Completion = Box<dyn FnOnce() + Send>;

/// Errors reported by layout lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Got bad changeGameLayout event code {0:?}")]
    UnknownCode(String),
}

/// What an active run change did to the current layout
#[derive(Debug, Clone, PartialEq)]
pub enum RunLayoutOutcome {
    /// There is no active run
    NoRun,
    /// The run ID did not change, so edits to the run are ignored
    SameRun,
    /// The run carries no layout code
    MissingLayout,
    /// The run's layout is already current
    Unchanged,
    /// The current layout was switched
    Changed(LayoutDescriptor),
    /// The run names a layout code that is not configured
    Unresolved(String),
}

/// Service trait for layout selection
pub trait LayoutService: Send + Sync {
    /// Case-insensitive lookup by code. An empty code is never found.
    fn find_layout(&self, code: &str) -> Option<LayoutDescriptor>;

    /// The layout currently published
    fn current(&self) -> LayoutDescriptor;

    /// Publishes a copy of `layout` as the current layout
    ///
    /// `completion` runs after the new value has been stored.
    fn change_layout(&self, layout: &LayoutDescriptor, completion: Option<Completion>);

    /// Handles a manual "change layout" command
    ///
    /// Unknown codes leave the current layout untouched and do not run
    /// `completion`.
    fn on_external_command(
        &self,
        code: &str,
        completion: Option<Completion>,
    ) -> Result<LayoutDescriptor, LayoutError>;

    /// Handles a change of the active run record
    fn on_active_run_changed(
        &self,
        old: Option<&ActiveRun>,
        new: Option<&ActiveRun>,
    ) -> RunLayoutOutcome;
}

/// LayoutService backed by the replicant store
#[derive(Debug, Clone)]
pub struct ReplicantLayoutService {
    layouts: Replicant<Vec<LayoutDescriptor>>,
    current: Replicant<LayoutDescriptor>,
}

impl ReplicantLayoutService {
    pub fn new(store: &Replicants) -> Self {
        Self {
            layouts: store.game_layouts.clone(),
            current: store.current_game_layout.clone(),
        }
    }
}

impl LayoutService for ReplicantLayoutService {
    fn find_layout(&self, code: &str) -> Option<LayoutDescriptor> {
        find_layout(&self.layouts.get(), code).cloned()
    }

    fn current(&self) -> LayoutDescriptor {
        self.current.get()
    }

    fn change_layout(&self, layout: &LayoutDescriptor, completion: Option<Completion>) {
        self.current.set(layout.clone());
        info!("Game Layout changed to {}.", layout.name);
        if let Some(completion) = completion {
            completion();
        }
    }

    fn on_external_command(
        &self,
        code: &str,
        completion: Option<Completion>,
    ) -> Result<LayoutDescriptor, LayoutError> {
        match self.find_layout(code) {
            Some(layout) => {
                self.change_layout(&layout, completion);
                Ok(layout)
            }
            None => {
                let err = LayoutError::UnknownCode(code.to_string());
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn on_active_run_changed(
        &self,
        old: Option<&ActiveRun>,
        new: Option<&ActiveRun>,
    ) -> RunLayoutOutcome {
        let Some(new) = new else {
            return RunLayoutOutcome::NoRun;
        };

        // Editing the current run's data must not undo a manual override.
        if old.is_some_and(|old| old.run_id == new.run_id) {
            debug!("Run ID {} did not change, not updating layout", new.run_id);
            return RunLayoutOutcome::SameRun;
        }

        let Some(code) = new.layout_code() else {
            warn!("Run ID {} does not have custom data for layout", new.run_id);
            return RunLayoutOutcome::MissingLayout;
        };

        let Some(layout) = self.find_layout(code) else {
            error!(
                "No layout found for run ID {}, layout {}",
                new.run_id, code
            );
            return RunLayoutOutcome::Unresolved(code.to_string());
        };

        if layout.matches(&self.current().code) {
            debug!(
                "Current layout {} matches new run ID {}, not changing",
                layout.code, new.run_id
            );
            return RunLayoutOutcome::Unchanged;
        }

        self.change_layout(&layout, None);
        RunLayoutOutcome::Changed(layout)
    }
}

/// Wires `service` to changes of the active run replicant
pub fn follow_active_run(
    service: Arc<dyn LayoutService>,
    active_run: &Replicant<Option<ActiveRun>>,
) {
    active_run.on_change(move |new, old| {
        service.on_active_run_changed(old.as_ref(), new.as_ref());
    });
}
