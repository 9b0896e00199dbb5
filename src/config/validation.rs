//! Configuration validation
//!
//! Semantic checks on a deserialized [`TypewriterConfig`]. Validation
//! collects ALL issues rather than stopping at the first, so `validate`
//! can report everything wrong with a file in one pass.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{CursorConfig, TimingOverrides, TypewriterConfig};
use crate::error::{Severity, ValidationIssue};

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(
        &mut self,
        config: &TypewriterConfig,
        limits: &ConfigLimits,
    ) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_phrases(&config.phrases, limits);
        self.validate_timing(&config.timing);
        self.validate_cursor(&config.cursor);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_phrases(&mut self, phrases: &[String], limits: &ConfigLimits) {
        if phrases.is_empty() {
            self.error("phrases", "phrase list is empty");
            return;
        }
        if phrases.len() > limits.max_phrases {
            self.error(
                "phrases",
                format!(
                    "{} phrases exceeds the limit of {}",
                    phrases.len(),
                    limits.max_phrases
                ),
            );
        }

        for (i, phrase) in phrases.iter().enumerate() {
            let path = format!("phrases[{i}]");
            if phrase.is_empty() {
                self.warning(&path, "phrase is empty and will only show the cursor");
                continue;
            }
            let chars = phrase.chars().count();
            if chars > limits.max_phrase_length {
                self.error(
                    &path,
                    format!(
                        "phrase is {chars} characters, limit is {}",
                        limits.max_phrase_length
                    ),
                );
            }
            if phrase.chars().any(char::is_control) {
                self.warning(
                    &path,
                    "phrase contains control characters that may break in-place rendering",
                );
            }
        }
    }

    fn validate_timing(&mut self, timing: &TimingOverrides) {
        let fields = [
            ("timing.typing_interval_ms", timing.typing_interval_ms),
            ("timing.deleting_interval_ms", timing.deleting_interval_ms),
            ("timing.pause_after_complete_ms", timing.pause_after_complete_ms),
        ];
        for (path, value) in fields {
            if value == Some(0) {
                self.error(path, "interval must be a positive number of milliseconds");
            }
        }
    }

    fn validate_cursor(&mut self, cursor: &CursorConfig) {
        if !cursor.enabled {
            return;
        }
        if cursor.blink_interval_ms == 0 {
            self.error(
                "cursor.blink_interval_ms",
                "blink interval must be a positive number of milliseconds",
            );
        }
        if cursor.glyph.is_empty() {
            self.warning("cursor.glyph", "cursor is enabled but its glyph is empty");
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}
