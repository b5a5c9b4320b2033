//! Cluster scaling bounds.
//!
//! The bounds file is a JSON object such as `{"minNodes": 1, "maxNodes": 10}`.
//! Decoding is permissive:
//! - missing fields default to zero and unknown fields are ignored
//! - keys match case-insensitively (`"MinNodes"` fills `min_nodes`)
//! - repeated keys are applied in document order, the last one wins
//! - a `null` document or field value leaves the zero value in place
//!
//! Parsing never checks the bounds against each other; that is
//! [`ClusterConfig::validate`]'s job.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::validation::{join_errors, ValidationError};

/// Minimum and maximum node counts an autoscaling policy may target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub min_nodes: i32,
    pub max_nodes: i32,
}

impl<'de> Deserialize<'de> for ClusterConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ClusterConfigVisitor)
    }
}

struct ClusterConfigVisitor;

impl<'de> Visitor<'de> for ClusterConfigVisitor {
    type Value = ClusterConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with minNodes and maxNodes")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ClusterConfig, E> {
        Ok(ClusterConfig::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<ClusterConfig, E> {
        Ok(ClusterConfig::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<ClusterConfig, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut config = ClusterConfig::default();

        while let Some(key) = map.next_key::<String>()? {
            let slot = if key.eq_ignore_ascii_case("minNodes") {
                &mut config.min_nodes
            } else if key.eq_ignore_ascii_case("maxNodes") {
                &mut config.max_nodes
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(value) = map.next_value::<Option<i32>>()? {
                *slot = value;
            }
        }

        Ok(config)
    }
}

/// Error type for loading scaling bounds.
#[derive(Debug, thiserror::Error)]
pub enum ClusterConfigError {
    #[error("failed to read cluster config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cluster config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid cluster config: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Decode scaling bounds from raw bytes.
pub fn parse_cluster_config(raw: &[u8]) -> Result<ClusterConfig, ClusterConfigError> {
    Ok(serde_json::from_slice(raw)?)
}

impl ClusterConfig {
    pub fn new(min_nodes: i32, max_nodes: i32) -> Self {
        Self { min_nodes, max_nodes }
    }

    /// Check the bounds against each other. Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.min_nodes < 0 {
            errors.push(ValidationError::new(
                "minNodes",
                format!("must not be negative, got {}", self.min_nodes),
            ));
        }
        if self.max_nodes < 0 {
            errors.push(ValidationError::new(
                "maxNodes",
                format!("must not be negative, got {}", self.max_nodes),
            ));
        }
        if self.min_nodes > self.max_nodes {
            errors.push(ValidationError::new(
                "minNodes",
                format!(
                    "must not exceed maxNodes ({} > {})",
                    self.min_nodes, self.max_nodes
                ),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Read, parse and validate a bounds file.
pub fn load_cluster_config(path: &Path) -> Result<ClusterConfig, ClusterConfigError> {
    let raw = fs::read(path).map_err(|source| ClusterConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_cluster_config(&raw)?;
    config.validate().map_err(ClusterConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_bounds() {
        let config = parse_cluster_config(br#"{"minNodes": 1, "maxNodes": 10}"#).unwrap();
        assert_eq!(config, ClusterConfig::new(1, 10));
    }

    #[test]
    fn test_parse_ignores_field_order_and_unknown_fields() {
        let raw = br#"{"maxNodes": 7, "region": "eu-west", "minNodes": 3}"#;
        let config = parse_cluster_config(raw).unwrap();
        assert_eq!(config, ClusterConfig::new(3, 7));
    }

    #[test]
    fn test_parse_missing_fields_default_to_zero() {
        let config = parse_cluster_config(br#"{"maxNodes": 4}"#).unwrap();
        assert_eq!(config, ClusterConfig::new(0, 4));

        let config = parse_cluster_config(b"{}").unwrap();
        assert_eq!(config, ClusterConfig::default());
    }

    #[test]
    fn test_parse_duplicate_key_keeps_last() {
        let raw = br#"{"minNodes": 1, "minNodes": 3, "maxNodes": 8}"#;
        assert_eq!(parse_cluster_config(raw).unwrap(), ClusterConfig::new(3, 8));
    }

    #[test]
    fn test_parse_null_document_is_zero_config() {
        assert_eq!(parse_cluster_config(b"null").unwrap(), ClusterConfig::default());
        assert_eq!(parse_cluster_config(b" null ").unwrap(), ClusterConfig::default());
    }

    #[test]
    fn test_parse_null_field_keeps_zero() {
        let raw = br#"{"minNodes": null, "maxNodes": 5}"#;
        assert_eq!(parse_cluster_config(raw).unwrap(), ClusterConfig::new(0, 5));
    }

    #[test]
    fn test_parse_keys_ignore_case() {
        let raw = br#"{"MinNodes": 4, "MAXNODES": 9}"#;
        assert_eq!(parse_cluster_config(raw).unwrap(), ClusterConfig::new(4, 9));
    }

    #[test]
    fn test_parse_non_object_is_error() {
        assert!(parse_cluster_config(b"[1, 10]").is_err());
        assert!(parse_cluster_config(b"42").is_err());
        assert!(parse_cluster_config(br#"{"minNodes": 1.5}"#).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_cluster_config(b"invalid-json-data").unwrap_err();
        assert!(matches!(err, ClusterConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse cluster config"));
    }

    #[test]
    fn test_parse_wrong_field_type() {
        let err = parse_cluster_config(br#"{"minNodes": "one"}"#).unwrap_err();
        assert!(matches!(err, ClusterConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_does_not_check_ordering() {
        let config = parse_cluster_config(br#"{"minNodes": 9, "maxNodes": 2}"#).unwrap();
        assert_eq!(config, ClusterConfig::new(9, 2));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let config = ClusterConfig::new(2, 12);
        let encoded = serde_json::to_vec(&config).unwrap();
        assert_eq!(parse_cluster_config(&encoded).unwrap(), config);
    }

    #[test]
    fn test_encodes_camel_case() {
        let encoded = serde_json::to_string(&ClusterConfig::new(1, 3)).unwrap();
        assert_eq!(encoded, r#"{"minNodes":1,"maxNodes":3}"#);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(ClusterConfig::new(1, 10).validate().is_ok());
        assert!(ClusterConfig::new(5, 5).validate().is_ok());

        let errors = ClusterConfig::new(9, 2).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "minNodes");
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let errors = ClusterConfig::new(-1, -3).validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
