#![no_main]

use libfuzzer_sys::fuzz_target;
use typewriter::config::TimingConfig;
use typewriter::engine::{EngineState, Mode, PhraseList, advance};

// Arbitrary starting states must never panic, and typing always resumes
// from a prefix of the active phrase.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = input.split('\n');
    let displayed = parts.next().unwrap_or_default().to_string();
    let Ok(phrases) = PhraseList::new(parts) else {
        return;
    };

    let mut state = EngineState {
        active_index: data.len(),
        displayed_text: displayed,
        mode: match data.first().map(|b| b % 3) {
            Some(1) => Mode::PausedAfterType,
            Some(2) => Mode::Deleting,
            _ => Mode::Typing,
        },
    };
    let timing = TimingConfig::default();
    for _ in 0..64 {
        let (next, _) = advance(&state, &phrases, &timing);
        assert!(next.active_index < phrases.len());
        if next.mode == Mode::Typing {
            assert!(phrases.get(next.active_index).starts_with(&next.displayed_text));
        }
        state = next;
    }
});
