//! Cancellable fixed-interval tasks tied to one lifecycle token

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns every recurring task of one dashboard instance.
///
/// Each task runs immediately, then again `interval` after the previous run
/// finished, so a single task never overlaps itself. Cancelling the lifecycle
/// token stops all of them, including a run that is still in flight.
pub struct Scheduler {
    lifecycle: CancellationToken,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl Scheduler {
    pub fn new(lifecycle: CancellationToken) -> Self {
        Self {
            lifecycle,
            tasks: Vec::new(),
        }
    }

    /// A clone of the token that stops this scheduler
    pub fn lifecycle(&self) -> CancellationToken {
        self.lifecycle.clone()
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Start running `task` every `interval` until the lifecycle ends
    pub fn every<F, Fut>(&mut self, name: &str, interval: Duration, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.lifecycle.clone();
        let task_name = name.to_string();

        let handle = tokio::spawn(async move {
            tracing::debug!("Task '{}' started, interval {:?}", task_name, interval);
            loop {
                tokio::select! {
                    _ = task() => {}
                    _ = cancel.cancelled() => break,
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel.cancelled() => break,
                }
            }
            tracing::debug!("Task '{}' cancelled", task_name);
        });

        self.tasks.push((name.to_string(), handle));
    }

    /// Cancel the lifecycle and wait for every task to stop
    pub async fn shutdown(self) {
        self.lifecycle.cancel();
        self.join().await;
    }

    /// Wait for every task to stop without cancelling
    pub async fn join(self) {
        for (name, handle) in self.tasks {
            if let Err(e) = handle.await {
                tracing::warn!("Task '{}' ended abnormally: {}", name, e);
            }
        }
    }
}
