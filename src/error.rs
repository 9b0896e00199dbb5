//! Error types for `typewriter`
//!
//! Construction-time configuration errors, configuration file errors,
//! scheduler errors, and the top-level error used by the CLI with its
//! exit code mapping.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `typewriter` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure, bad phrase list)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied, closed stdout)
    pub const IO_ERROR: i32 = 3;

    /// Engine scheduler error (task panicked or was aborted)
    pub const ENGINE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `typewriter` operations.
///
/// Aggregates all domain-specific errors and maps each one to a
/// process exit code.
#[derive(Debug, Error)]
pub enum TypewriterError {
    /// Engine construction rejected the phrase list or timing values
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfiguration),

    /// Configuration file loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scheduler task error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Invalid command-line usage not caught by the argument parser
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TypewriterError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_) | Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Engine(_) => ExitCode::ENGINE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Construction Errors
// ============================================================================

/// Rejected engine configuration.
///
/// Raised synchronously when an engine is created; an engine that fails
/// this check is never started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    /// The phrase list has no entries
    #[error("invalid configuration: phrase list is empty")]
    EmptyPhrases,

    /// A timing interval is zero
    #[error("invalid configuration: {field} must be a positive number of milliseconds")]
    NonPositiveInterval {
        /// Name of the offending timing field
        field: &'static str,
    },
}

// ============================================================================
// Configuration File Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("configuration file too large: {size} bytes (limit: {limit})")]
    TooLarge {
        /// Actual file size in bytes
        size: usize,
        /// Configured size limit in bytes
        limit: usize,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({message})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with the `${VAR:?message}` reference
        message: String,
    },

    /// Phrase list or timing rejected at engine construction
    #[error(transparent)]
    Invalid(#[from] InvalidConfiguration),
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "timing.typing_interval_ms")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Scheduler task errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The scheduler task panicked
    #[error("scheduler task panicked: {0}")]
    Panicked(String),

    /// The scheduler task was aborted before it finished
    #[error("scheduler task aborted")]
    Aborted,
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Self::Aborted
        } else {
            Self::Panicked(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = TypewriterError::from(InvalidConfiguration::EmptyPhrases);
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);

        let err = TypewriterError::from(ConfigError::MissingFile {
            path: PathBuf::from("missing.yaml"),
        });
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);

        let err = TypewriterError::from(EngineError::Aborted);
        assert_eq!(err.exit_code(), ExitCode::ENGINE_ERROR);

        let err = TypewriterError::Usage("no phrases".to_string());
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);

        let err = TypewriterError::from(std::io::Error::other("boom"));
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_invalid_configuration_display() {
        assert_eq!(
            InvalidConfiguration::EmptyPhrases.to_string(),
            "invalid configuration: phrase list is empty"
        );
        let err = InvalidConfiguration::NonPositiveInterval {
            field: "typing_interval_ms",
        };
        assert!(err.to_string().contains("typing_interval_ms"));
    }

    #[test]
    fn test_config_error_wraps_invalid_configuration() {
        let err = ConfigError::from(InvalidConfiguration::EmptyPhrases);
        assert!(matches!(
            err,
            ConfigError::Invalid(InvalidConfiguration::EmptyPhrases)
        ));
        assert_eq!(err.to_string(), "invalid configuration: phrase list is empty");
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "phrases[1]".to_string(),
            message: "phrase is empty".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(issue.to_string(), "warning: phrase is empty at phrases[1]");
    }
}
