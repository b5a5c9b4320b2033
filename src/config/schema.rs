//! Configuration schema definitions.
//!
//! This module defines the agent configuration structure.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Root configuration for the agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Address the agent reports for itself.
    pub server: ServerConfig,

    /// Discovery and validation settings for the management server.
    pub vmt: VmtConfig,

    /// Scaling bounds source.
    pub cluster: ClusterSourceConfig,

    /// Shutdown behavior.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AgentConfig {
    pub fn with_vm_is_base(mut self, vm_is_base: bool) -> Self {
        self.vmt.vm_is_base = vm_is_base;
        self
    }

    pub fn with_discovery_interval(mut self, secs: u64) -> Self {
        self.vmt.discovery_interval_secs = secs;
        self
    }

    pub fn with_validation_timeout(mut self, secs: u64) -> Self {
        self.vmt.validation_timeout_secs = secs;
        self
    }

    pub fn with_validation_workers(mut self, workers: usize) -> Self {
        self.vmt.validation_workers = workers;
        self
    }

    pub fn with_scaling_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cluster.scaling_config_path = Some(path.into());
        self
    }
}

/// Agent server settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1").
    pub address: String,

    /// Port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Discovery and validation settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct VmtConfig {
    /// Priority of VM entities relative to containers (-1 = default).
    pub vm_priority: i32,

    /// Whether VMs are treated as the base entity.
    pub vm_is_base: bool,

    /// Interval between discoveries in seconds.
    pub discovery_interval_secs: u64,

    /// Timeout for validating a target in seconds.
    pub validation_timeout_secs: u64,

    /// Number of concurrent validation workers.
    pub validation_workers: usize,
}

impl Default for VmtConfig {
    fn default() -> Self {
        Self {
            vm_priority: -1,
            vm_is_base: true,
            discovery_interval_secs: 600,
            validation_timeout_secs: 60,
            validation_workers: 10,
        }
    }
}

/// Where scaling bounds come from.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClusterSourceConfig {
    /// Path to the JSON bounds file.
    pub scaling_config_path: Option<PathBuf>,

    /// Reload the bounds file when it changes.
    pub watch: bool,
}

/// Shutdown settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to wait for cleanup after a termination signal, in seconds.
    pub cleanup_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            cleanup_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
