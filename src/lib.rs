//! Cluster management agent core.
//!
//! - `lifecycle`: shutdown events, exit handlers and the completion handle
//! - `config`: agent configuration and cluster scaling bounds
//! - `observability`: logging setup

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{parse_cluster_config, AgentConfig, ClusterConfig, ClusterConfigError};
pub use lifecycle::{register_shutdown_handler, Shutdown, ShutdownRegistration, WaitGroup};
