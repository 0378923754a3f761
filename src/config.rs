//! Planner configuration
//!
//! A single JSON object; every field is optional and falls back to its
//! default. `load` validates before returning.

use std::fs;
use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::{EligibilityOptions, DEFAULT_INDEX_BATCH_SIZE};
use crate::observability::Severity;
use crate::organization::CompactionSetCreator;
use crate::temporal::TemporalFunction;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "SHARD_CONFIG_READ",
            ConfigError::Parse(_) => "SHARD_CONFIG_PARSE",
            ConfigError::Invalid(_) => "SHARD_CONFIG_INVALID",
        }
    }
}

/// Planner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Byte threshold for a compacted shard (default 256 MiB)
    #[serde(default = "default_max_shard_size_bytes")]
    pub max_shard_size_bytes: u64,

    /// Row threshold for a compacted shard (default 1,000,000)
    #[serde(default = "default_max_shard_rows")]
    pub max_shard_rows: u64,

    /// Reference zone for day computation: "UTC", "Z" or "+hh:mm"
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Shard ids per index query (default 1000)
    #[serde(default = "default_index_batch_size")]
    pub index_batch_size: usize,

    /// Resolve sort-column ranges during extraction
    #[serde(default)]
    pub include_sort_columns: bool,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_shard_size_bytes() -> u64 {
    256 * 1024 * 1024
}
fn default_max_shard_rows() -> u64 {
    1_000_000
}
fn default_time_zone() -> String {
    "+00:00".to_string()
}
fn default_index_batch_size() -> usize {
    DEFAULT_INDEX_BATCH_SIZE
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_shard_size_bytes: default_max_shard_size_bytes(),
            max_shard_rows: default_max_shard_rows(),
            time_zone: default_time_zone(),
            index_batch_size: default_index_batch_size(),
            include_sort_columns: false,
            log_level: default_log_level(),
        }
    }
}

impl PlannerConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: PlannerConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Zero thresholds are accepted; they leave every shard adequate.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.index_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "index_batch_size must be > 0".to_string(),
            ));
        }
        self.zone()?;
        self.severity()?;
        Ok(())
    }

    pub fn zone(&self) -> ConfigResult<FixedOffset> {
        match self.time_zone.trim() {
            "UTC" | "utc" | "Z" => Ok(Utc.fix()),
            zone => zone.parse::<FixedOffset>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "time_zone '{}' is not 'UTC' or a '+hh:mm' offset",
                    self.time_zone
                ))
            }),
        }
    }

    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    pub fn temporal_function(&self) -> ConfigResult<TemporalFunction> {
        Ok(TemporalFunction::new(self.zone()?))
    }

    pub fn creator(&self) -> ConfigResult<CompactionSetCreator> {
        Ok(CompactionSetCreator::new(
            self.temporal_function()?,
            self.max_shard_size_bytes,
            self.max_shard_rows,
        ))
    }

    pub fn eligibility(&self) -> EligibilityOptions {
        EligibilityOptions {
            include_sort_columns: self.include_sort_columns,
            batch_size: self.index_batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join("planner.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.max_shard_size_bytes, 268_435_456);
        assert_eq!(config.max_shard_rows, 1_000_000);
        assert_eq!(config.index_batch_size, 1000);
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.zone().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_config_overrides() {
        let config = PlannerConfig::from_json(
            &json!({
                "max_shard_size_bytes": 100,
                "max_shard_rows": 10,
                "time_zone": "-08:00",
                "include_sort_columns": true,
                "log_level": "trace"
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(config.zone().unwrap().local_minus_utc(), -8 * 3600);
        assert_eq!(config.severity().unwrap(), Severity::Trace);
        let creator = config.creator().unwrap();
        assert_eq!(creator.max_shard_size_bytes(), 100);
        assert_eq!(creator.max_shard_rows(), 10);
        assert!(config.eligibility().include_sort_columns);
    }

    #[test]
    fn test_utc_alias() {
        let config = PlannerConfig {
            time_zone: "UTC".to_string(),
            ..PlannerConfig::default()
        };
        assert_eq!(config.zone().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_config_rejects_zero_batch() {
        let err = PlannerConfig::from_json(r#"{"index_batch_size": 0}"#).unwrap_err();
        assert_eq!(err.code(), "SHARD_CONFIG_INVALID");
    }

    #[test]
    fn test_config_rejects_bad_zone_and_level() {
        assert!(PlannerConfig::from_json(r#"{"time_zone": "Mars/Olympus"}"#).is_err());
        assert!(PlannerConfig::from_json(r#"{"log_level": "loud"}"#).is_err());
    }

    #[test]
    fn test_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = PlannerConfig::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), "SHARD_CONFIG_READ");
    }

    #[test]
    fn test_config_bad_json() {
        let err = PlannerConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), "SHARD_CONFIG_PARSE");
    }

    #[test]
    fn test_zero_thresholds_allowed() {
        let config =
            PlannerConfig::from_json(r#"{"max_shard_size_bytes": 0, "max_shard_rows": 0}"#)
                .unwrap();
        assert_eq!(config.max_shard_rows, 0);
    }
}
