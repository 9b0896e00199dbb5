//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size limit check
//! 2. Environment variable substitution (pre-parse, on raw text)
//! 3. YAML parsing and deserialization to [`TypewriterConfig`]
//! 4. Validation (collects all issues)
//! 5. Timing resolution and freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::schema::{TimingConfig, TypewriterConfig};
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub config_limits: ConfigLimits,

    /// Phrases that replace the file's list before validation.
    pub phrase_override: Option<Vec<String>>,
}

/// Limits that keep a configuration from exhausting memory or the terminal.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of phrases.
    pub max_phrases: usize,

    /// Maximum phrase length in characters.
    pub max_phrase_length: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_phrases: env_or("TYPEWRITER_MAX_PHRASES", 1000),
            max_phrase_length: env_or("TYPEWRITER_MAX_PHRASE_LENGTH", 1000),
            max_config_size: env_or("TYPEWRITER_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<TypewriterConfig>,

    /// Timing with defaults filled in.
    pub timing: TimingConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required environment variable is unset
    /// - YAML parsing or deserialization fails
    /// - Validation finds any errors
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.config_limits.max_config_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > limit {
            return Err(ConfigError::TooLarge {
                size: file_size,
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = raw.len(), "loading configuration");
        self.load_source(&raw, path)
    }

    /// Loads and validates configuration text that did not come from a file.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus file access errors.
    pub fn load_from_str(&self, content: &str) -> Result<LoadResult, ConfigError> {
        let limit = self.options.config_limits.max_config_size;
        if content.len() > limit {
            return Err(ConfigError::TooLarge {
                size: content.len(),
                limit,
            });
        }
        self.load_source(content, Path::new("<inline>"))
    }

    fn load_source(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();

        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let substituted = substitute_env(raw, path, &mut warnings)?;

        let value: serde_yaml::Value =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        if value.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "configuration is empty".to_string(),
            });
        }

        let mut config: TypewriterConfig =
            serde_yaml::from_value(value).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("failed to deserialize configuration: {e}"),
            })?;

        if let Some(phrases) = &self.options.phrase_override {
            debug!(phrases = phrases.len(), "replacing configured phrases");
            config.phrases.clone_from(phrases);
        }

        let result = Validator::new().validate(&config, &self.options.config_limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }
        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        for warning in &warnings {
            warn!(path = %path.display(), "{warning}");
        }

        let timing = config.timing.resolve()?;

        Ok(LoadResult {
            config: Arc::new(config),
            timing,
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Substitutes environment variables in raw YAML text before parsing.
///
/// Supports:
/// - `${VAR}` - value, or empty string with a warning if unset
/// - `${VAR:-default}` - `default` if unset
/// - `${VAR:?message}` - error if unset
/// - `$$` - literal `$`
fn substitute_env(
    raw: &str,
    source: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(body) = after.strip_prefix('{') {
            let Some(close) = body.find('}') else {
                return Err(ConfigError::ParseError {
                    path: source.to_path_buf(),
                    line: None,
                    message: format!("unclosed environment variable reference: ${{{body}"),
                });
            };
            let reference = &body[..close];
            out.push_str(&expand_var(reference, source, warnings)?);
            rest = &body[close + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }
    out.push_str(rest);

    Ok(out)
}

/// Expands the inside of one `${...}` reference.
fn expand_var(
    reference: &str,
    source: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let (name, fallback) = match reference.split_once(":-") {
        Some((name, default)) => (name, Fallback::Default(default)),
        None => match reference.split_once(":?") {
            Some((name, message)) => (name, Fallback::Required(message)),
            None => (reference, Fallback::Warn),
        },
    };

    if let Ok(value) = std::env::var(name) {
        return Ok(value);
    }

    match fallback {
        Fallback::Default(default) => Ok(default.to_string()),
        Fallback::Required(message) => Err(ConfigError::EnvVarNotSet {
            var: name.to_string(),
            message: message.to_string(),
        }),
        Fallback::Warn => {
            warnings.push(LoadWarning {
                message: format!("environment variable '{name}' is not set, using empty string"),
                location: Some(source.display().to_string()),
            });
            Ok(String::new())
        }
    }
}

enum Fallback<'a> {
    Default(&'a str),
    Required(&'a str),
    Warn,
}

/// Parses an environment variable, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default path used when `run` is given no `--config`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from("typewriter.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(raw: &str) -> (Result<String, ConfigError>, Vec<LoadWarning>) {
        let mut warnings = Vec::new();
        let result = substitute_env(raw, Path::new("test.yaml"), &mut warnings);
        (result, warnings)
    }

    #[test]
    fn test_env_substitution_simple() {
        // PATH is always set on Unix/Windows
        let (result, warnings) = sub("path: ${PATH}");
        let result = result.unwrap();
        assert!(!result.contains("${PATH}"));
        assert!(result.len() > "path: ".len());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_env_substitution_default() {
        let (result, _) = sub("value: ${TYPEWRITER_TEST_NONEXISTENT_XYZ123:-fallback}");
        assert_eq!(result.unwrap(), "value: fallback");
    }

    #[test]
    fn test_env_substitution_required_missing() {
        let (result, _) = sub("value: ${TYPEWRITER_TEST_REQUIRED_XYZ123:?must be set}");
        match result {
            Err(ConfigError::EnvVarNotSet { var, message }) => {
                assert_eq!(var, "TYPEWRITER_TEST_REQUIRED_XYZ123");
                assert_eq!(message, "must be set");
            }
            other => panic!("expected EnvVarNotSet, got {other:?}"),
        }
    }

    #[test]
    fn test_env_substitution_escaped_dollar() {
        let (result, _) = sub("price: $$100 and $5");
        assert_eq!(result.unwrap(), "price: $100 and $5");
    }

    #[test]
    fn test_env_substitution_missing_warning() {
        let (result, warnings) = sub("value: ${TYPEWRITER_TEST_WARN_XYZ123}");
        assert_eq!(result.unwrap(), "value: ");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("TYPEWRITER_TEST_WARN_XYZ123"));
    }

    #[test]
    fn test_env_substitution_unclosed() {
        let (result, _) = sub("value: ${OOPS");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_from_str_resolves_timing() {
        let loader = ConfigLoader::with_defaults();
        let result = loader
            .load_from_str("phrases: [Hi]\ntiming:\n  pause_after_complete_ms: 100\n")
            .unwrap();
        assert_eq!(result.config.phrases, vec!["Hi"]);
        assert_eq!(result.timing, TimingConfig::new(50, 30, 100).unwrap());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_from_str_empty_document() {
        let loader = ConfigLoader::with_defaults();
        let err = loader.load_from_str("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_load_from_str_validation_error() {
        let loader = ConfigLoader::with_defaults();
        let err = loader.load_from_str("phrases: []\n").unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "phrases");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_str_size_limit() {
        let loader = ConfigLoader::new(LoaderOptions {
            config_limits: ConfigLimits {
                max_phrases: 10,
                max_phrase_length: 10,
                max_config_size: 8,
            },
            phrase_override: None,
        });
        let err = loader.load_from_str("phrases: [abcdef]").unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn test_phrase_override_replaces_file_phrases() {
        let loader = ConfigLoader::new(LoaderOptions {
            phrase_override: Some(vec!["Hi".to_string(), "Go".to_string()]),
            ..LoaderOptions::default()
        });
        let result = loader
            .load_from_str("phrases: []\ntiming:\n  typing_interval_ms: 10\n")
            .unwrap();
        assert_eq!(result.config.phrases, vec!["Hi", "Go"]);
        assert_eq!(result.timing.typing_interval_ms(), 10);

        let err = loader
            .load_from_str("phrases: [a]\ntiming:\n  typing_interval_ms: 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_missing_phrases_key_is_validation_error() {
        let err = ConfigLoader::with_defaults()
            .load_from_str("timing:\n  typing_interval_ms: 10\n")
            .unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => assert_eq!(errors[0].path, "phrases"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_strips_bom() {
        let loader = ConfigLoader::with_defaults();
        let result = loader.load_from_str("\u{feff}phrases: [a]").unwrap();
        assert_eq!(result.config.phrases, vec!["a"]);
    }

    #[test]
    fn test_config_limits_default() {
        let limits = ConfigLimits::default();
        assert!(limits.max_phrases > 0);
        assert!(limits.max_phrase_length > 0);
        assert!(limits.max_config_size > 0);
    }

    #[test]
    fn test_load_warning_display() {
        let warning = LoadWarning {
            message: "phrase is empty".to_string(),
            location: Some("phrases[0]".to_string()),
        };
        assert_eq!(warning.to_string(), "phrase is empty at phrases[0]");
    }
}
