//! Configuration schema types
//!
//! Typed configuration for typewriter engines and the terminal host.
//! These types are deserialized from YAML configuration files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::InvalidConfiguration;

/// Default delay between typed characters.
pub const DEFAULT_TYPING_INTERVAL_MS: u64 = 50;

/// Default delay between deleted characters.
pub const DEFAULT_DELETING_INTERVAL_MS: u64 = 30;

/// Default pause once a phrase is fully typed.
pub const DEFAULT_PAUSE_AFTER_COMPLETE_MS: u64 = 2000;

/// Default cursor blink half-period (visible for this long, then hidden).
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 500;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a typewriter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypewriterConfig {
    /// Phrases to type and delete, in order (must be non-empty unless
    /// replaced by the caller)
    #[serde(default)]
    pub phrases: Vec<String>,

    /// Optional timing overrides; missing fields take the defaults
    #[serde(default)]
    pub timing: TimingOverrides,

    /// Cursor decoration settings
    #[serde(default)]
    pub cursor: CursorConfig,
}

// ============================================================================
// Timing
// ============================================================================

/// Validated step timing for an engine.
///
/// All three intervals are positive. Construct through [`TimingConfig::new`]
/// or [`TimingOverrides::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimingConfig {
    typing_interval_ms: u64,
    deleting_interval_ms: u64,
    pause_after_complete_ms: u64,
}

impl TimingConfig {
    /// Creates a timing configuration from millisecond values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::NonPositiveInterval`] naming the first
    /// field that is zero.
    pub const fn new(
        typing_interval_ms: u64,
        deleting_interval_ms: u64,
        pause_after_complete_ms: u64,
    ) -> Result<Self, InvalidConfiguration> {
        if typing_interval_ms == 0 {
            return Err(InvalidConfiguration::NonPositiveInterval {
                field: "typing_interval_ms",
            });
        }
        if deleting_interval_ms == 0 {
            return Err(InvalidConfiguration::NonPositiveInterval {
                field: "deleting_interval_ms",
            });
        }
        if pause_after_complete_ms == 0 {
            return Err(InvalidConfiguration::NonPositiveInterval {
                field: "pause_after_complete_ms",
            });
        }
        Ok(Self {
            typing_interval_ms,
            deleting_interval_ms,
            pause_after_complete_ms,
        })
    }

    /// Delay between typed characters.
    #[must_use]
    pub const fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    /// Delay between deleted characters.
    #[must_use]
    pub const fn deleting_interval(&self) -> Duration {
        Duration::from_millis(self.deleting_interval_ms)
    }

    /// Pause between a phrase being fully typed and deletion starting.
    #[must_use]
    pub const fn pause_after_complete(&self) -> Duration {
        Duration::from_millis(self.pause_after_complete_ms)
    }

    /// Delay between typed characters, in milliseconds.
    #[must_use]
    pub const fn typing_interval_ms(&self) -> u64 {
        self.typing_interval_ms
    }

    /// Delay between deleted characters, in milliseconds.
    #[must_use]
    pub const fn deleting_interval_ms(&self) -> u64 {
        self.deleting_interval_ms
    }

    /// Post-typing pause, in milliseconds.
    #[must_use]
    pub const fn pause_after_complete_ms(&self) -> u64 {
        self.pause_after_complete_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: DEFAULT_TYPING_INTERVAL_MS,
            deleting_interval_ms: DEFAULT_DELETING_INTERVAL_MS,
            pause_after_complete_ms: DEFAULT_PAUSE_AFTER_COMPLETE_MS,
        }
    }
}

/// Caller-supplied timing where every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingOverrides {
    /// Delay between typed characters (default 50)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing_interval_ms: Option<u64>,

    /// Delay between deleted characters (default 30)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleting_interval_ms: Option<u64>,

    /// Pause once a phrase is fully typed (default 2000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_after_complete_ms: Option<u64>,
}

impl TimingOverrides {
    /// Fills missing fields with defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::NonPositiveInterval`] if any supplied
    /// value is zero.
    pub fn resolve(&self) -> Result<TimingConfig, InvalidConfiguration> {
        TimingConfig::new(
            self.typing_interval_ms.unwrap_or(DEFAULT_TYPING_INTERVAL_MS),
            self.deleting_interval_ms.unwrap_or(DEFAULT_DELETING_INTERVAL_MS),
            self.pause_after_complete_ms.unwrap_or(DEFAULT_PAUSE_AFTER_COMPLETE_MS),
        )
    }

    /// Layers `other` on top of `self`: fields set in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            typing_interval_ms: other.typing_interval_ms.or(self.typing_interval_ms),
            deleting_interval_ms: other.deleting_interval_ms.or(self.deleting_interval_ms),
            pause_after_complete_ms: other
                .pause_after_complete_ms
                .or(self.pause_after_complete_ms),
        }
    }
}

impl From<TimingConfig> for TimingOverrides {
    fn from(timing: TimingConfig) -> Self {
        Self {
            typing_interval_ms: Some(timing.typing_interval_ms),
            deleting_interval_ms: Some(timing.deleting_interval_ms),
            pause_after_complete_ms: Some(timing.pause_after_complete_ms),
        }
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Blinking cursor decoration rendered after the typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CursorConfig {
    /// Whether the cursor is drawn at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Time the cursor stays in each visibility state
    #[serde(default = "default_blink_interval_ms")]
    pub blink_interval_ms: u64,

    /// Text drawn for the cursor
    #[serde(default = "default_glyph")]
    pub glyph: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            glyph: default_glyph(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_blink_interval_ms() -> u64 {
    DEFAULT_BLINK_INTERVAL_MS
}

fn default_glyph() -> String {
    "|".to_string()
}
