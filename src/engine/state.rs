//! Engine state representation
//!
//! The immutable phrase list, the three-phase mode, and the per-step
//! engine state that [`advance`](super::advance) transforms.

use std::sync::Arc;

use serde::Serialize;

use crate::error::InvalidConfiguration;

/// Ordered, non-empty list of phrases, captured once at construction.
///
/// Backed by shared immutable storage so clones are cheap and the list
/// cannot change for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseList(Arc<[String]>);

impl PhraseList {
    /// Creates a phrase list.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::EmptyPhrases`] if `phrases` yields
    /// nothing.
    pub fn new<I, S>(phrases: I) -> Result<Self, InvalidConfiguration>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Arc<[String]> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(InvalidConfiguration::EmptyPhrases);
        }
        Ok(Self(phrases))
    }

    /// Number of phrases (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the phrase at `index`, wrapping modulo the list length.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }

    /// Iterates the phrases in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Which way the displayed text is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Growing toward the full phrase
    #[default]
    Typing,
    /// Fully typed, waiting before deletion starts
    PausedAfterType,
    /// Shrinking toward empty
    Deleting,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Typing => "typing",
            Self::PausedAfterType => "paused",
            Self::Deleting => "deleting",
        };
        f.write_str(s)
    }
}

/// Snapshot of a typewriter between two steps.
///
/// `displayed_text` is always a prefix of the active phrase, taken on a
/// `char` boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EngineState {
    /// Index of the phrase currently being typed or deleted
    pub active_index: usize,
    /// Visible prefix of the active phrase
    pub displayed_text: String,
    /// Current direction
    pub mode: Mode,
}

impl EngineState {
    /// Initial state: first phrase, nothing shown, typing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters currently shown.
    #[must_use]
    pub fn displayed_chars(&self) -> usize {
        self.displayed_text.chars().count()
    }
}
