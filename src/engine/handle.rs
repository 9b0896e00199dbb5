//! Engine scheduling and lifecycle
//!
//! An [`EngineHandle`] owns one background task that holds the engine state
//! and exactly one outstanding timer. Each time the timer fires the task runs
//! [`advance`], publishes the resulting [`Frame`], and re-arms the timer with
//! the returned delay. Steps are therefore strictly serialized.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::{TimingConfig, TimingOverrides};
use crate::error::{EngineError, InvalidConfiguration};

use super::state::{EngineState, Mode, PhraseList};
use super::step::advance;

/// Observable snapshot published after every step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Frame {
    /// Text the host should render
    pub text: String,
    /// Index of the active phrase
    pub active_index: usize,
    /// Mode the engine is in after this step
    pub mode: Mode,
    /// Number of steps taken so far (0 before the first step)
    pub step: u64,
}

impl Frame {
    fn from_state(state: &EngineState, step: u64) -> Self {
        Self {
            text: state.displayed_text.clone(),
            active_index: state.active_index,
            mode: state.mode,
            step,
        }
    }
}

/// Handle to a running typewriter.
///
/// Dropping the handle stops the engine, so an unmounted host can never
/// leak its timer.
#[derive(Debug)]
pub struct EngineHandle {
    frames: watch::Receiver<Frame>,
    timing: watch::Sender<TimingConfig>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Validates the configuration and starts a typewriter.
    ///
    /// Missing timing fields default to 50 / 30 / 2000 ms.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if `phrases` is empty or any timing
    /// value is zero. No task is spawned in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn create<I, S>(
        phrases: I,
        overrides: TimingOverrides,
    ) -> Result<Self, InvalidConfiguration>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases = PhraseList::new(phrases)?;
        let timing = overrides.resolve()?;
        Ok(Self::spawn(phrases, timing))
    }

    /// Like [`create`](Self::create), but a rejected configuration yields a
    /// stopped handle that permanently displays `""` instead of an error.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn create_or_blank<I, S>(phrases: I, overrides: TimingOverrides) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Self::create(phrases, overrides) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "typewriter misconfigured; rendering nothing");
                Self::blank()
            }
        }
    }

    /// Starts a typewriter from an already-validated phrase list and timing.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(phrases: PhraseList, timing: TimingConfig) -> Self {
        let (frame_tx, frame_rx) = watch::channel(Frame::default());
        let (timing_tx, timing_rx) = watch::channel(timing);
        let cancel = CancellationToken::new();

        debug!(
            phrases = phrases.len(),
            typing_ms = timing.typing_interval_ms(),
            deleting_ms = timing.deleting_interval_ms(),
            pause_ms = timing.pause_after_complete_ms(),
            "starting typewriter"
        );

        let task = tokio::spawn(run_scheduler(phrases, timing_rx, frame_tx, cancel.clone()));

        Self {
            frames: frame_rx,
            timing: timing_tx,
            cancel,
            task: Some(task),
        }
    }

    /// A handle with no task whose text is always empty.
    #[must_use]
    pub fn blank() -> Self {
        let (_, frame_rx) = watch::channel(Frame::default());
        let (timing_tx, _) = watch::channel(TimingConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        Self {
            frames: frame_rx,
            timing: timing_tx,
            cancel,
            task: None,
        }
    }

    /// The most recently published text.
    #[must_use]
    pub fn displayed_text(&self) -> String {
        self.frames.borrow().text.clone()
    }

    /// The most recently published frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// A receiver notified on every published frame.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Stream of frames, starting with the current one. Ends once the
    /// engine stops.
    #[must_use]
    pub fn updates(&self) -> WatchStream<Frame> {
        WatchStream::new(self.frames.clone())
    }

    /// Current timing.
    #[must_use]
    pub fn timing(&self) -> TimingConfig {
        *self.timing.borrow()
    }

    /// Replaces the timing. The delay already in flight is left alone; the
    /// next step computes its delay from the new values.
    pub fn set_timing(&self, timing: TimingConfig) {
        self.timing.send_replace(timing);
    }

    /// Cancels the outstanding timer. Calling it again is a no-op.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!("stopping typewriter");
        }
        self.cancel.cancel();
    }

    /// Whether [`stop`](Self::stop) has been called (or the handle is blank).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the engine and waits for its task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the task panicked or was aborted.
    pub async fn join(mut self) -> Result<(), EngineError> {
        self.stop();
        match self.task.take() {
            Some(task) => task.await.map_err(EngineError::from),
            None => Ok(()),
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Scheduler loop: one timer in flight, re-armed after every step.
async fn run_scheduler(
    phrases: PhraseList,
    mut timing: watch::Receiver<TimingConfig>,
    frames: watch::Sender<Frame>,
    cancel: CancellationToken,
) {
    let mut state = EngineState::new();
    let mut delay: Duration = timing.borrow().typing_interval();
    let mut step: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(step, "typewriter scheduler cancelled");
                break;
            }
            () = tokio::time::sleep(delay) => {}
        }

        let current_timing = *timing.borrow_and_update();
        let (next, next_delay) = advance(&state, &phrases, &current_timing);
        step = step.saturating_add(1);

        if next.active_index != state.active_index {
            if next.active_index == 0 {
                info!(step, phrases = phrases.len(), "phrase cycle complete");
            } else {
                debug!(step, phrase = next.active_index, "next phrase");
            }
        }
        trace!(
            step,
            mode = %next.mode,
            text = %next.displayed_text,
            delay_ms = u64::try_from(next_delay.as_millis()).unwrap_or(u64::MAX),
            "typewriter step"
        );

        if cancel.is_cancelled() {
            break;
        }
        frames.send_replace(Frame::from_state(&next, step));
        state = next;
        delay = next_delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;
    use tokio_stream::StreamExt;

    fn timing(typing: u64, deleting: u64, pause: u64) -> TimingOverrides {
        TimingOverrides {
            typing_interval_ms: Some(typing),
            deleting_interval_ms: Some(deleting),
            pause_after_complete_ms: Some(pause),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_arrive_at_step_delays() {
        let handle = EngineHandle::create(["Hi", "Go"], timing(50, 30, 100)).unwrap();
        let mut rx = handle.subscribe();
        let start = Instant::now();

        let expected = [
            ("H", 50),
            ("Hi", 100),
            ("Hi", 150),
            ("Hi", 250),
            ("H", 280),
            ("", 310),
            ("", 340),
            ("G", 390),
        ];
        for (text, at_ms) in expected {
            rx.changed().await.unwrap();
            let frame = rx.borrow_and_update().clone();
            assert_eq!(frame.text, text);
            assert_eq!(start.elapsed(), Duration::from_millis(at_ms));
        }
        assert_eq!(handle.frame().active_index, 1);
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let handle = EngineHandle::create(["Hello"], TimingOverrides::default()).unwrap();
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(handle.displayed_text(), "H");

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.displayed_text(), "H");
        assert_eq!(handle.frame().step, 1);
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let handle = EngineHandle::create(["Hello"], TimingOverrides::default()).unwrap();
        let mut rx = handle.subscribe();
        drop(handle);

        // The task exits and drops its sender, closing the channel.
        let result = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(result.is_ok(), "scheduler should exit after drop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_timing_applies_to_next_step() {
        let handle = EngineHandle::create(["Hello"], timing(50, 30, 2000)).unwrap();
        let mut rx = handle.subscribe();
        let start = Instant::now();

        rx.changed().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(50));
        handle.set_timing(TimingConfig::new(200, 30, 2000).unwrap());
        assert_eq!(handle.timing().typing_interval_ms(), 200);

        // In-flight delay was armed with the old interval.
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().text, "He");
        assert_eq!(start.elapsed(), Duration::from_millis(100));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().text, "Hel");
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_phrases() {
        let phrases: Vec<String> = Vec::new();
        let err = EngineHandle::create(phrases, TimingOverrides::default()).unwrap_err();
        assert_eq!(err, InvalidConfiguration::EmptyPhrases);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_timing() {
        let err = EngineHandle::create(["a"], timing(50, 0, 10)).unwrap_err();
        assert_eq!(
            err,
            InvalidConfiguration::NonPositiveInterval {
                field: "deleting_interval_ms"
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_or_blank_renders_nothing() {
        let phrases: Vec<&str> = Vec::new();
        let handle = EngineHandle::create_or_blank(phrases, TimingOverrides::default());
        assert!(handle.is_stopped());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.displayed_text(), "");
        assert_eq!(handle.frame(), Frame::default());
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_stream() {
        let handle = EngineHandle::create(["ab"], TimingOverrides::default()).unwrap();
        let texts: Vec<String> = handle
            .updates()
            .take(3)
            .map(|frame| frame.text)
            .collect()
            .await;
        assert_eq!(texts, vec!["", "a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_updates_stream_ends() {
        let handle = EngineHandle::blank();
        let frames: Vec<Frame> = handle.updates().collect().await;
        assert_eq!(frames, vec![Frame::default()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_engines_are_independent() {
        let fast = EngineHandle::create(["abc"], timing(10, 10, 10)).unwrap();
        let slow = EngineHandle::create(["xyz"], timing(100, 10, 10)).unwrap();

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(fast.displayed_text(), "abc");
        assert_eq!(slow.displayed_text(), "");

        fast.stop();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fast.displayed_text(), "abc");
        assert_eq!(slow.displayed_text(), "x");
    }
}
