//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, ports valid)
//! - Detect settings that depend on each other
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::AgentConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate an agent configuration.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.address.trim().is_empty() {
        errors.push(ValidationError::new("server.address", "must not be empty"));
    }
    if config.server.port == 0 {
        errors.push(ValidationError::new("server.port", "must be greater than 0"));
    }

    if config.vmt.discovery_interval_secs == 0 {
        errors.push(ValidationError::new(
            "vmt.discovery_interval_secs",
            "must be greater than 0",
        ));
    }
    if config.vmt.validation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "vmt.validation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.vmt.validation_workers == 0 {
        errors.push(ValidationError::new(
            "vmt.validation_workers",
            "must be greater than 0",
        ));
    }

    if config.cluster.watch && config.cluster.scaling_config_path.is_none() {
        errors.push(ValidationError::new(
            "cluster.watch",
            "requires cluster.scaling_config_path",
        ));
    }

    if config.shutdown.cleanup_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "shutdown.cleanup_timeout_secs",
            "must be greater than 0",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
