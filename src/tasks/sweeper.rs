//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! nobody reads again do not hold memory forever.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Owned handle to a running sweep task.
///
/// The task stops when [`Sweeper::cancel`] or [`Sweeper::stop`] is called,
/// or when the handle is dropped.
#[derive(Debug)]
pub struct Sweeper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns a task that sweeps `cache` every `interval`.
    ///
    /// The first sweep happens one full interval after spawning. Must be
    /// called from within a tokio runtime.
    ///
    /// # Example
    /// ```ignore
    /// let cache = TtlCache::new(Duration::from_secs(120));
    /// let sweeper = Sweeper::spawn(cache.clone(), Duration::from_secs(60));
    /// // Later, during shutdown:
    /// sweeper.stop().await;
    /// ```
    pub fn spawn<V>(cache: TtlCache<V>, interval: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let child = token.child_token();

        let handle = tokio::spawn(async move {
            info!("Starting TTL sweep task with interval of {:?}", interval);

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                let removed = cache.purge_expired().await;

                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }

            debug!("TTL sweep task stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Signals the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stops the task and waits for it to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
