//! Shutdown event source for the agent.

use tokio::sync::broadcast;

/// Source of "shutdown requested" events.
///
/// Backed by a single-slot broadcast channel. OS signals are one producer
/// (see [`crate::lifecycle::signals`]); tests and embedded callers can call
/// [`Shutdown::trigger`] directly.
#[derive(Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown event source.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to shutdown events.
    ///
    /// Only events triggered after this call are observed by the receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Request shutdown. A no-op when nobody is subscribed.
    pub fn trigger(&self) {
        let delivered = self.tx.send(()).unwrap_or(0);
        tracing::debug!(receivers = delivered, "Shutdown requested");
    }

    /// Number of listeners still waiting for an event.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
