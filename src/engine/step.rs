//! The typewriter step function
//!
//! [`advance`] is pure: it reads the current state, the phrase list and the
//! timing, and returns the next state together with how long the caller
//! should wait before stepping again. The delay always belongs to the mode
//! the step lands in.

use std::time::Duration;

use crate::config::TimingConfig;

use super::state::{EngineState, Mode, PhraseList};

/// Computes the next engine state and the delay before the following step.
///
/// | mode              | condition  | effect                         | delay    |
/// |-------------------|------------|--------------------------------|----------|
/// | `Typing`          | not full   | append next character          | typing   |
/// | `Typing`          | full       | enter `PausedAfterType`        | pause    |
/// | `PausedAfterType` |            | enter `Deleting`               | deleting |
/// | `Deleting`        | not empty  | remove last character          | deleting |
/// | `Deleting`        | empty      | next phrase, enter `Typing`    | typing   |
///
/// A `Typing` state whose text is not a prefix of its phrase (only built by
/// hand) restarts that phrase from empty.
#[must_use]
pub fn advance(
    state: &EngineState,
    phrases: &PhraseList,
    timing: &TimingConfig,
) -> (EngineState, Duration) {
    let active_index = state.active_index % phrases.len();
    let phrase = phrases.get(active_index);

    match state.mode {
        Mode::Typing => {
            let Some(remaining) = phrase.strip_prefix(state.displayed_text.as_str()) else {
                return (
                    EngineState {
                        active_index,
                        displayed_text: String::new(),
                        mode: Mode::Typing,
                    },
                    timing.typing_interval(),
                );
            };
            match remaining.chars().next() {
                Some(next) => {
                    let mut displayed_text =
                        String::with_capacity(state.displayed_text.len() + next.len_utf8());
                    displayed_text.push_str(&state.displayed_text);
                    displayed_text.push(next);
                    (
                        EngineState {
                            active_index,
                            displayed_text,
                            mode: Mode::Typing,
                        },
                        timing.typing_interval(),
                    )
                }
                None => (
                    EngineState {
                        active_index,
                        displayed_text: state.displayed_text.clone(),
                        mode: Mode::PausedAfterType,
                    },
                    timing.pause_after_complete(),
                ),
            }
        }
        Mode::PausedAfterType => (
            EngineState {
                active_index,
                displayed_text: state.displayed_text.clone(),
                mode: Mode::Deleting,
            },
            timing.deleting_interval(),
        ),
        Mode::Deleting => {
            if state.displayed_text.is_empty() {
                return (
                    EngineState {
                        active_index: (active_index + 1) % phrases.len(),
                        displayed_text: String::new(),
                        mode: Mode::Typing,
                    },
                    timing.typing_interval(),
                );
            }
            let mut displayed_text = state.displayed_text.clone();
            displayed_text.pop();
            (
                EngineState {
                    active_index,
                    displayed_text,
                    mode: Mode::Deleting,
                },
                timing.deleting_interval(),
            )
        }
    }
}
