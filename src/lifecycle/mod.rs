//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     single-slot broadcast of "shutdown requested" events
//!
//! Exit handler (handler.rs):
//!     first event → run disconnect callback → WaitGroup::done
//!
//! Caller:
//!     WaitGroup::wait → exit
//! ```
//!
//! # Design Decisions
//! - Signals are only one producer of shutdown events; anything holding a
//!   `Shutdown` can request it, which keeps the path testable without
//!   real OS signals
//! - Listeners cannot be cancelled once registered

pub mod completion;
pub mod handler;
pub mod shutdown;
pub mod signals;

pub use completion::WaitGroup;
pub use handler::{register_shutdown_handler, ShutdownError, ShutdownRegistration};
pub use shutdown::Shutdown;
