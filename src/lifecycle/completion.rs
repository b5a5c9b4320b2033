//! Completion handle tracking outstanding shutdown work.

use std::time::Duration;
use tokio::sync::watch;

/// Counts outstanding units of work; waiters resume once the count is zero.
///
/// Clones share the same counter.
#[derive(Clone, Debug)]
pub struct WaitGroup {
    count: watch::Sender<usize>,
}

impl WaitGroup {
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self { count }
    }

    /// Register `n` more units of outstanding work.
    pub fn add(&self, n: usize) {
        self.count.send_modify(|count| *count += n);
    }

    /// Mark one unit of work as finished.
    pub fn done(&self) {
        let mut underflow = false;
        self.count.send_if_modified(|count| {
            if *count == 0 {
                underflow = true;
                false
            } else {
                *count -= 1;
                true
            }
        });

        if underflow {
            tracing::warn!("WaitGroup::done called with no outstanding work");
        }
    }

    /// Current number of outstanding units.
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Wait until every registered unit of work is done.
    pub async fn wait(&self) {
        let mut rx = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Like [`WaitGroup::wait`] but gives up after `timeout`.
    ///
    /// Returns `true` when all work finished in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}
