//! OS signal handling.
//!
//! Translates SIGTERM/SIGINT into [`Shutdown`] events. Every signal is
//! forwarded; exit handlers consume only the first one.

use std::io;
use tokio::task::JoinHandle;

use crate::lifecycle::completion::WaitGroup;
use crate::lifecycle::handler::{register_shutdown_handler, ShutdownRegistration};
use crate::lifecycle::shutdown::Shutdown;

/// Run `on_exit` once the process receives SIGTERM or SIGINT.
///
/// The exit handler subscribes before the signal handlers are installed, so
/// no signal can be forwarded while nobody is listening for it.
pub fn handle_exit<F>(
    completion: &WaitGroup,
    shutdown: &Shutdown,
    on_exit: F,
) -> io::Result<ShutdownRegistration>
where
    F: FnOnce() + Send + 'static,
{
    let registration = register_shutdown_handler(completion, shutdown, on_exit);
    forward_termination_signals(shutdown.clone())?;
    Ok(registration)
}

/// Install termination signal handlers and forward them into `shutdown`.
///
/// Handlers are installed before this returns, so a signal sent right
/// afterwards is not lost. Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn forward_termination_signals(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                received = sigterm.recv() => match received {
                    Some(()) => "SIGTERM",
                    None => break,
                },
                received = sigint.recv() => match received {
                    Some(()) => "SIGINT",
                    None => break,
                },
            };

            tracing::info!(signal = name, "Termination signal received");
            shutdown.trigger();
        }
    }))
}

#[cfg(not(unix))]
pub fn forward_termination_signals(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(signal = "ctrl-c", "Termination signal received");
            shutdown.trigger();
        }
    }))
}
