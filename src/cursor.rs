//! Blinking cursor decoration
//!
//! The cursor drawn after the typed text blinks on its own clock: visible
//! for one interval, hidden for the next, starting visible. It never reads
//! engine state, so text and cursor timing are independent.

use std::time::Duration;

use crate::config::CursorConfig;

/// Blink schedule and glyph for one cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBlink {
    interval: Duration,
    glyph: String,
    blank: String,
}

impl CursorBlink {
    /// Creates a cursor toggling every `interval`.
    ///
    /// Returns `None` for a zero interval (a cursor that would never settle).
    #[must_use]
    pub fn new(interval: Duration, glyph: impl Into<String>) -> Option<Self> {
        if interval.is_zero() {
            return None;
        }
        let glyph = glyph.into();
        let blank = " ".repeat(glyph.chars().count());
        Some(Self {
            interval,
            glyph,
            blank,
        })
    }

    /// Builds the cursor described by `config`, or `None` when disabled.
    #[must_use]
    pub fn from_config(config: &CursorConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Self::new(
            Duration::from_millis(config.blink_interval_ms),
            config.glyph.clone(),
        )
    }

    /// Time spent in each visibility state.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the cursor is visible `elapsed` after it started blinking.
    #[must_use]
    pub fn is_visible(&self, elapsed: Duration) -> bool {
        let phase = elapsed.as_nanos() / self.interval.as_nanos();
        phase % 2 == 0
    }

    /// The text to draw: the glyph when visible, same-width padding when not,
    /// so the line length never changes between blinks.
    #[must_use]
    pub fn render(&self, visible: bool) -> &str {
        if visible { &self.glyph } else { &self.blank }
    }
}
