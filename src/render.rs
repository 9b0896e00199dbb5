//! Terminal rendering host
//!
//! Mounts on an [`EngineHandle`], redraws whenever a new frame is published
//! or the cursor blinks, and stops on shutdown or when the engine ends.

use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cursor::CursorBlink;
use crate::engine::EngineHandle;

/// ANSI "erase to end of line".
const CLEAR_EOL: &str = "\x1b[K";

/// How frames are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Redraw a single line in place with a blinking cursor.
    #[default]
    InPlace,
    /// One line per text change, no cursor. Suitable for pipes.
    Plain,
}

/// Formats one in-place redraw of `text` followed by `cursor`.
#[must_use]
pub fn format_in_place(text: &str, cursor: &str) -> String {
    format!("\r{text}{cursor}{CLEAR_EOL}")
}

/// Writes engine frames to an async writer.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
    cursor: Option<CursorBlink>,
    style: RenderStyle,
}

impl<W: AsyncWrite + Unpin> TerminalRenderer<W> {
    /// Creates a renderer. `cursor` is ignored in [`RenderStyle::Plain`].
    pub const fn new(out: W, cursor: Option<CursorBlink>, style: RenderStyle) -> Self {
        Self { out, cursor, style }
    }

    /// Renders until `shutdown` is cancelled or the engine stops publishing.
    ///
    /// Returns the number of writes performed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing to the output fails.
    pub async fn run(
        &mut self,
        handle: &EngineHandle,
        shutdown: &CancellationToken,
    ) -> std::io::Result<u64> {
        let mut frames = handle.subscribe();
        let started = Instant::now();
        let mut blink = match (self.style, &self.cursor) {
            (RenderStyle::InPlace, Some(cursor)) => Some(blink_ticker(cursor.interval())),
            _ => None,
        };

        let mut text = frames.borrow_and_update().text.clone();
        let mut writes = 0u64;
        if self.style == RenderStyle::InPlace {
            self.draw(&text, started.elapsed()).await?;
            writes += 1;
        }

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    debug!(writes, "renderer shutting down");
                    break;
                }
                changed = frames.changed() => {
                    if changed.is_err() {
                        debug!(writes, "engine stopped publishing");
                        break;
                    }
                    let next = frames.borrow_and_update().text.clone();
                    if self.style == RenderStyle::Plain && next == text {
                        continue;
                    }
                    text = next;
                    self.draw(&text, started.elapsed()).await?;
                    writes += 1;
                }
                () = next_blink(blink.as_mut()) => {
                    self.draw(&text, started.elapsed()).await?;
                    writes += 1;
                }
            }
        }

        if self.style == RenderStyle::InPlace {
            // Leave the final text on screen without the cursor.
            self.out
                .write_all(format!("{}\n", format_in_place(&text, "")).as_bytes())
                .await?;
        }
        self.out.flush().await?;
        Ok(writes)
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    async fn draw(&mut self, text: &str, elapsed: Duration) -> std::io::Result<()> {
        let line = match self.style {
            RenderStyle::Plain => format!("{text}\n"),
            RenderStyle::InPlace => {
                let cursor = self
                    .cursor
                    .as_ref()
                    .map_or("", |c| c.render(c.is_visible(elapsed)));
                format_in_place(text, cursor)
            }
        };
        self.out.write_all(line.as_bytes()).await?;
        self.out.flush().await
    }
}

/// Interval that fires at each blink boundary (skipping the immediate tick).
fn blink_ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Waits for the next blink, or forever when there is no cursor.
async fn next_blink(blink: Option<&mut Interval>) {
    match blink {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingOverrides;

    fn overrides() -> TimingOverrides {
        TimingOverrides {
            typing_interval_ms: Some(50),
            deleting_interval_ms: Some(30),
            pause_after_complete_ms: Some(1000),
        }
    }

    fn cancel_after(ms: u64) -> CancellationToken {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            child.cancel();
        });
        token
    }

    #[test]
    fn test_format_in_place() {
        assert_eq!(format_in_place("Hi", "|"), "\rHi|\x1b[K");
        assert_eq!(format_in_place("", ""), "\r\x1b[K");
    }

    #[tokio::test(start_paused = true)]
    async fn test_plain_prints_text_changes() {
        let handle = EngineHandle::create(["ab"], overrides()).unwrap();
        let shutdown = cancel_after(220);
        let mut renderer = TerminalRenderer::new(Vec::new(), None, RenderStyle::Plain);

        let writes = renderer.run(&handle, &shutdown).await.unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        // 50ms "a", 100ms "ab", 150ms paused (same text, skipped)
        assert_eq!(out, "a\nab\n");
        assert_eq!(writes, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_place_without_cursor() {
        let handle = EngineHandle::create(["ab"], overrides()).unwrap();
        let shutdown = cancel_after(120);
        let mut renderer = TerminalRenderer::new(Vec::new(), None, RenderStyle::InPlace);

        renderer.run(&handle, &shutdown).await.unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "\r\x1b[K\ra\x1b[K\rab\x1b[K\rab\x1b[K\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_blinks_between_frames() {
        let handle = EngineHandle::create(["a"], overrides()).unwrap();
        let cursor = CursorBlink::new(Duration::from_millis(200), "|");
        let shutdown = cancel_after(450);
        let mut renderer = TerminalRenderer::new(Vec::new(), cursor, RenderStyle::InPlace);

        renderer.run(&handle, &shutdown).await.unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        // 0 initial, 50 "a", 100 paused, 200 blink off, 400 blink on, exit
        assert_eq!(
            out,
            "\r|\x1b[K\ra|\x1b[K\ra|\x1b[K\ra \x1b[K\ra|\x1b[K\ra\x1b[K\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_when_engine_is_stopped() {
        let handle = EngineHandle::blank();
        let shutdown = CancellationToken::new();
        let mut renderer = TerminalRenderer::new(Vec::new(), None, RenderStyle::Plain);

        let writes = renderer.run(&handle, &shutdown).await.unwrap();
        assert_eq!(writes, 0);
        assert!(renderer.into_inner().is_empty());
    }
}
