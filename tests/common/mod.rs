//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Records whether (and how often) a cleanup callback ran.
///
/// The state is only reachable through accessors so readers on other
/// threads never touch a raw mutable cell.
#[derive(Clone, Default)]
pub struct InvocationProbe {
    called: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InvocationProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the probe as called.
    pub fn call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called.store(true, Ordering::SeqCst);
    }

    pub fn got_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A cleanup callback that records into this probe.
    pub fn callback(&self) -> impl FnOnce() + Send + 'static {
        let probe = self.clone();
        move || {
            tracing::info!("Mock disconnecting process is running");
            probe.call();
        }
    }
}
