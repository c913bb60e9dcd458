//! Top-level service
//!
//! Owns the replicant store, the layout service and the tracker poller
//! handles, and dispatches inbound commands.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{error, info};

use crate::command::Command;
use crate::config::Config;
use crate::repository::TrackerRepository;
use crate::scheduler::{PollerHandles, TrackerPoller};
use crate::service::{LayoutService, ReplicantLayoutService, follow_active_run};
use crate::store::Replicants;

pub struct Stagehand {
    store: Replicants,
    layouts: Arc<dyn LayoutService>,
    pollers: Option<PollerHandles>,
}

impl Stagehand {
    /// Builds the store from the configured layouts and wires the layout
    /// service to the active run.
    pub fn new(config: &Config) -> Result<Self> {
        let store = Replicants::new(config.layouts())?;
        let layouts: Arc<dyn LayoutService> = Arc::new(ReplicantLayoutService::new(&store));
        follow_active_run(Arc::clone(&layouts), &store.active_run);

        info!(
            "Loaded {} layouts, current layout: {}",
            store.game_layouts.get().len(),
            store.current_game_layout.get()
        );

        Ok(Self {
            store,
            layouts,
            pollers: None,
        })
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &Replicants {
        &self.store
    }

    /// Starts polling the tracker. Replaces any previous poller.
    pub fn start_tracker(&mut self, repository: Arc<dyn TrackerRepository>, interval: Duration) {
        let poller = Arc::new(TrackerPoller::new(repository, &self.store));
        self.pollers = Some(poller.start(interval));
    }

    /// Applies one command
    pub fn handle(&self, command: Command) {
        match command {
            Command::ChangeLayout { code, reply } => {
                let completion = reply.map(|tx| {
                    Box::new(move || {
                        let _ = tx.send(());
                    }) as crate::service::Completion
                });
                // Unknown codes are already logged by the service.
                let _ = self.layouts.on_external_command(&code, completion);
            }
            Command::SetActiveRun(run) => {
                self.store.active_run.set(run);
            }
            Command::Snapshot => match self.store.snapshot() {
                Ok(snapshot) => println!("{}", snapshot),
                Err(e) => error!("Failed to serialize snapshot: {:#}", e),
            },
        }
    }

    /// Runs until Ctrl-C is received
    pub async fn run(self, commands: mpsc::Receiver<Command>) -> Result<()> {
        self.run_until(commands, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl-C");
        })
        .await
    }

    /// Runs until `shutdown` completes
    ///
    /// A closed command channel only stops command handling; the tracker
    /// keeps polling until shutdown.
    pub async fn run_until<F>(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut accepting = true;

        loop {
            tokio::select! {
                biased;

                command = commands.recv(), if accepting => match command {
                    Some(command) => self.handle(command),
                    None => {
                        info!("No more commands, running until shutdown");
                        accepting = false;
                    }
                },
                _ = &mut shutdown => break,
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Stops the tracker poller, if running
    pub fn shutdown(&mut self) {
        if let Some(pollers) = self.pollers.take() {
            pollers.cancel();
            info!("Tracker poller stopped");
        }
    }
}
