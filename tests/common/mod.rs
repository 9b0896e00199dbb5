//! Shared integration-test harness for running the `typewriter` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Helpers for spawning the compiled `typewriter` binary.
pub struct TypewriterProcess;

impl TypewriterProcess {
    /// Runs the binary to completion with `args` and captures its output.
    ///
    /// Logging is silenced so stderr only carries error reports.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_typewriter");
        Command::new(bin)
            .args(args)
            .env_remove("TYPEWRITER_CONFIG")
            .env_remove("TYPEWRITER_LOG_LEVEL")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .output()
            .expect("failed to run typewriter")
    }

    /// Returns the path to a fixture under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}
