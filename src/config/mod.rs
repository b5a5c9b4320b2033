//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! agent config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!
//! scaling bounds file (JSON)
//!     → cluster.rs (decode, then validate min/max)
//!     → ClusterConfig
//!
//! On bounds file change:
//!     watcher.rs detects change
//!     → cluster.rs reloads and validates
//!     → new ClusterConfig sent to the agent
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cluster;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use cluster::{load_cluster_config, parse_cluster_config, ClusterConfig, ClusterConfigError};
pub use loader::{load_config, read_config, ConfigError};
pub use schema::AgentConfig;
pub use validation::ValidationError;
