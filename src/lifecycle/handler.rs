//! Exit handler: runs the disconnect callback once shutdown is requested.
//!
//! # Guarantees
//! - The callback runs at most once per registration, no matter how many
//!   shutdown events arrive.
//! - The callback has returned before the completion handle is marked done,
//!   so code after `WaitGroup::wait` observes all of its effects.
//! - A panicking callback is caught and reported through
//!   [`ShutdownRegistration::failure`]; the completion handle is still
//!   released so the caller never hangs on it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::lifecycle::completion::WaitGroup;
use crate::lifecycle::shutdown::Shutdown;

/// Errors reported by an exit handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShutdownError {
    #[error("cleanup callback panicked: {0}")]
    CallbackPanicked(String),
}

#[derive(Default)]
struct RegistrationState {
    fired: AtomicBool,
    failure: OnceLock<String>,
}

/// Handle to a registered exit handler.
///
/// Dropping it detaches the listener; it keeps waiting for the rest of the
/// process lifetime.
pub struct ShutdownRegistration {
    state: Arc<RegistrationState>,
    listener: JoinHandle<()>,
}

impl ShutdownRegistration {
    /// Whether the callback has been invoked.
    pub fn has_fired(&self) -> bool {
        self.state.fired.load(Ordering::Acquire)
    }

    /// The callback's failure, if it panicked.
    pub fn failure(&self) -> Option<ShutdownError> {
        self.state
            .failure
            .get()
            .map(|message| ShutdownError::CallbackPanicked(message.clone()))
    }

    /// Whether the listener is still waiting for a shutdown event.
    pub fn is_listening(&self) -> bool {
        !self.listener.is_finished()
    }
}

/// Register `on_exit` to run once the first shutdown event arrives.
///
/// Adds one unit of work to `completion` and releases it after `on_exit`
/// returns. The subscription happens before this function returns, so an
/// event triggered right after registration is not missed.
///
/// `on_exit` runs on the listener task; it should not block for long.
/// Must be called from within a tokio runtime.
pub fn register_shutdown_handler<F>(
    completion: &WaitGroup,
    shutdown: &Shutdown,
    on_exit: F,
) -> ShutdownRegistration
where
    F: FnOnce() + Send + 'static,
{
    completion.add(1);
    let mut events = shutdown.subscribe();
    let completion = completion.clone();
    let state = Arc::new(RegistrationState::default());
    let listener_state = Arc::clone(&state);

    let listener = tokio::spawn(async move {
        match events.recv().await {
            // Lagged still means at least one event was sent.
            Ok(()) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => {
                tracing::warn!("Shutdown source dropped before any event, cleanup will not run");
                return;
            }
        }
        drop(events);

        tracing::info!("Shutdown requested, running cleanup");
        match panic::catch_unwind(AssertUnwindSafe(on_exit)) {
            Ok(()) => tracing::info!("Cleanup finished"),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(error = %message, "Cleanup callback panicked");
                let _ = listener_state.failure.set(message);
            }
        }

        listener_state.fired.store(true, Ordering::Release);
        completion.done();
    });

    ShutdownRegistration { state, listener }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn test_callback_runs_once_per_event() {
        let wg = WaitGroup::new();
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let registration = register_shutdown_handler(&wg, &shutdown, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(wg.count(), 1);

        shutdown.trigger();
        assert!(wg.wait_timeout(Duration::from_secs(5)).await);

        assert!(registration.has_fired());
        assert!(registration.failure().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_event_no_callback() {
        let wg = WaitGroup::new();
        let shutdown = Shutdown::new();

        let registration = register_shutdown_handler(&wg, &shutdown, || {
            panic!("must not run without a shutdown event");
        });

        assert!(!wg.wait_timeout(Duration::from_millis(50)).await);
        assert!(!registration.has_fired());
        assert!(registration.is_listening());
        assert_eq!(wg.count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_events_do_not_rerun_callback() {
        let wg = WaitGroup::new();
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let _registration = register_shutdown_handler(&wg, &shutdown, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        shutdown.trigger();
        shutdown.trigger();
        shutdown.trigger();
        assert!(wg.wait_timeout(Duration::from_secs(5)).await);

        shutdown.trigger();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(wg.count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_callback_is_reported() {
        let wg = WaitGroup::new();
        let shutdown = Shutdown::new();

        let registration = register_shutdown_handler(&wg, &shutdown, || {
            panic!("connection already torn down");
        });

        shutdown.trigger();
        assert!(wg.wait_timeout(Duration::from_secs(5)).await);

        assert!(registration.has_fired());
        assert_eq!(
            registration.failure(),
            Some(ShutdownError::CallbackPanicked(
                "connection already torn down".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_dropped_source_leaves_work_outstanding() {
        let wg = WaitGroup::new();
        let shutdown = Shutdown::new();

        let registration = register_shutdown_handler(&wg, &shutdown, || {});
        drop(shutdown);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!registration.is_listening());
        assert!(!registration.has_fired());
        assert_eq!(wg.count(), 1);
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "unknown panic payload");
    }
}
