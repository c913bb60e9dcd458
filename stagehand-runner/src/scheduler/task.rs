//! Repeating tasks

use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::debug;

/// Handle to a job that runs immediately and then on a fixed interval
///
/// Every tick spawns the job as its own task, so a slow run never delays
/// the next one. Dropping the handle cancels the schedule; runs already in
/// flight finish on their own.
#[derive(Debug)]
pub struct RepeatingTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    /// Starts `job` now and every `period` after that
    ///
    /// `period` must be non-zero.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, job: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                debug!("Running {}", name);
                tokio::spawn(job());
            }
        });

        Self { name, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stops scheduling new runs
    pub fn cancel(&self) {
        debug!("Cancelling {}", self.name);
        self.handle.abort();
    }

    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
