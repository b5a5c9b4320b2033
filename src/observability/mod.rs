//! Observability subsystem.
//!
//! Structured logging only; every subsystem emits `tracing` events with
//! key/value fields and the binary installs the subscriber once at startup.

pub mod logging;

pub use logging::init_logging;
