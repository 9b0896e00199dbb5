//! `run` command handler
//!
//! Resolves phrases, timing and cursor from the configuration file and
//! flags, mounts an engine, and renders it to stdout until interrupted.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::args::RunArgs;
use crate::config::loader::{ConfigLoader, LoaderOptions, default_config_path};
use crate::config::schema::{CursorConfig, TimingOverrides};
use crate::cursor::CursorBlink;
use crate::engine::EngineHandle;
use crate::error::TypewriterError;
use crate::render::{RenderStyle, TerminalRenderer};

/// Everything `run` needs after merging file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Phrases to animate.
    pub phrases: Vec<String>,
    /// Merged timing overrides (flags win over the file).
    pub timing: TimingOverrides,
    /// Cursor settings.
    pub cursor: CursorConfig,
}

/// Animate phrases in the terminal.
///
/// # Errors
///
/// Returns a usage error if no phrases are available, a configuration error
/// if the file or timing is invalid, or an I/O error if stdout fails.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), TypewriterError> {
    let plan = plan(args)?;

    let style = if args.plain || !std::io::stdout().is_terminal() {
        RenderStyle::Plain
    } else {
        RenderStyle::InPlace
    };
    let cursor = CursorBlink::from_config(&plan.cursor);

    let handle = EngineHandle::create(plan.phrases, plan.timing)?;
    info!(?style, cursor = cursor.is_some(), "typewriter running");

    let shutdown = cancel.child_token();
    let deadline = args.duration.map(|duration| {
        let token = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            debug!(?duration, "run duration elapsed");
            token.cancel();
        })
    });

    let mut renderer = TerminalRenderer::new(tokio::io::stdout(), cursor, style);
    let result = renderer.run(&handle, &shutdown).await;

    if let Some(deadline) = deadline {
        deadline.abort();
    }
    handle.join().await?;

    let writes = result?;
    info!(writes, "typewriter stopped");
    Ok(())
}

/// Merges the configuration file (if any) with command-line flags.
///
/// `--phrase` flags replace the file's phrase list before validation, so a
/// file with no usable phrases still supplies timing and cursor settings.
///
/// # Errors
///
/// Returns a configuration error if the file fails to load, or a usage
/// error if neither the file nor the flags provide any phrases.
pub fn plan(args: &RunArgs) -> Result<RunPlan, TypewriterError> {
    let config_path: Option<PathBuf> = args.config.clone().or_else(|| {
        let fallback = default_config_path();
        (args.phrases.is_empty() && fallback.exists()).then_some(fallback)
    });

    let loaded = match config_path {
        Some(path) => {
            info!(config = %path.display(), "loading configuration");
            // Flag phrases are validated in place of the file's list.
            let options = LoaderOptions {
                phrase_override: (!args.phrases.is_empty()).then(|| args.phrases.clone()),
                ..LoaderOptions::default()
            };
            Some(ConfigLoader::new(options).load(&path)?)
        }
        None => None,
    };

    let (file_phrases, file_timing, mut cursor) = match loaded {
        Some(result) => (
            result.config.phrases.clone(),
            result.config.timing,
            result.config.cursor.clone(),
        ),
        None => (Vec::new(), TimingOverrides::default(), CursorConfig::default()),
    };

    let phrases = if args.phrases.is_empty() {
        file_phrases
    } else {
        args.phrases.clone()
    };
    if phrases.is_empty() {
        return Err(TypewriterError::Usage(
            "no phrases: pass --phrase or --config".to_string(),
        ));
    }

    let flags = TimingOverrides {
        typing_interval_ms: args.typing.map(duration_ms),
        deleting_interval_ms: args.deleting.map(duration_ms),
        pause_after_complete_ms: args.pause.map(duration_ms),
    };

    if args.no_cursor {
        cursor.enabled = false;
    }

    Ok(RunPlan {
        phrases,
        timing: file_timing.merged_with(&flags),
        cursor,
    })
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
