//! Background task registry
//!
//! Owns the cancellation token handed to every long-running task of a
//! session (today: the sync poller) and joins them on shutdown.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A registered background task
struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Background task manager
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("sync_worker", async move { worker.run().await });
/// tasks.shutdown(Duration::from_secs(5)).await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks watch for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a background task
    ///
    /// A panic inside the task is caught and logged instead of tearing
    /// down the runtime. A task returning before shutdown was requested is
    /// logged as unexpected.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let wrapped_future = async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) => {
                    if !shutdown.is_cancelled() {
                        tracing::warn!(task = %name, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    tracing::error!(
                        task = %name,
                        panic = %panic_message(panic_info.as_ref()),
                        "Background task panicked"
                    );
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, "Registered background task");
        self.tasks.push(RegisteredTask { name, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks that already finished while they should be running
    pub fn check_health(&self) -> usize {
        let failed = self
            .tasks
            .iter()
            .filter(|task| task.handle.is_finished())
            .inspect(|task| tracing::error!(task = %task.name, "Background task unexpectedly finished"))
            .count();
        if failed > 0 {
            tracing::error!(failed, total = self.tasks.len(), "Background task health check failed");
        }
        failed
    }

    /// Cancel every task and wait for each to finish, aborting stragglers
    /// after `timeout`
    pub async fn shutdown(self, timeout: Duration) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for mut task in self.tasks {
            match tokio::time::timeout(timeout, &mut task.handle).await {
                Ok(Ok(())) => tracing::debug!(task = %task.name, "Task completed"),
                Ok(Err(e)) => tracing::error!(task = %task.name, error = ?e, "Task failed"),
                Err(_) => {
                    tracing::warn!(task = %task.name, "Task did not stop in time, aborting");
                    task.handle.abort();
                }
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
