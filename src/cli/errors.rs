//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::metadata::MetadataError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Catalog file missing or malformed
    CatalogError,
    /// Planning pass aborted by the metadata store
    PlanFailed,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SHARD_CLI_CONFIG_ERROR",
            Self::CatalogError => "SHARD_CLI_CATALOG_ERROR",
            Self::PlanFailed => "SHARD_CLI_PLAN_FAILED",
            Self::IoError => "SHARD_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn catalog_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::CatalogError, msg)
    }

    pub fn plan_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PlanFailed, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("[{}] {}", e.code(), e))
    }
}

impl From<MetadataError> for CliError {
    fn from(e: MetadataError) -> Self {
        Self::plan_failed(format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::from(MetadataError::TableNotFound(3));
        assert_eq!(err.code(), &CliErrorCode::PlanFailed);
        let display = err.to_string();
        assert!(display.starts_with("SHARD_CLI_PLAN_FAILED"));
        assert!(display.contains("SHARD_METADATA_TABLE_NOT_FOUND"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(ConfigError::Invalid("bad".to_string()));
        assert_eq!(err.code_str(), "SHARD_CLI_CONFIG_ERROR");
        assert!(err.message().contains("SHARD_CONFIG_INVALID"));
    }
}
