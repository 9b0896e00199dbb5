//! CLI argument definitions
//!
//! All Clap derive structs for `typewriter` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Typewriter text animation in the terminal.
#[derive(Parser, Debug)]
#[command(name = "typewriter", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TYPEWRITER_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, env = "TYPEWRITER_LOG_FORMAT")]
    pub log_format: OutputFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Animate phrases in the terminal.
    Run(RunArgs),

    /// Validate configuration files without running them.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Run
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "TYPEWRITER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Phrase to type (repeatable). Replaces the configuration file's phrases.
    #[arg(short, long = "phrase", value_name = "TEXT")]
    pub phrases: Vec<String>,

    /// Delay between typed characters (e.g. `50ms`).
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub typing: Option<Duration>,

    /// Delay between deleted characters (e.g. `30ms`).
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub deleting: Option<Duration>,

    /// Pause after a phrase is fully typed (e.g. `2s`).
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub pause: Option<Duration>,

    /// Do not draw the blinking cursor.
    #[arg(long)]
    pub no_cursor: bool,

    /// Print one line per text change instead of redrawing in place.
    #[arg(long)]
    pub plain: bool,

    /// Stop after this long instead of running until interrupted.
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,
}

// ============================================================================
// Validate / Version
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal support.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Output format for reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}
