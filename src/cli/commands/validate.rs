//! `validate` command handler
//!
//! Loads each configuration file through the full pipeline and reports
//! errors and warnings without starting an engine.

use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader::{ConfigLoader, LoadResult};
use crate::error::{ConfigError, TypewriterError};

/// Validate configuration files.
///
/// Every file is checked and reported before returning.
///
/// # Errors
///
/// Returns the first file's error if any file is invalid.
pub fn validate(args: &ValidateArgs) -> Result<(), TypewriterError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        info!(file = %path.display(), "validating configuration");
        match loader.load(path) {
            Ok(result) => reports.push(report_ok(path, &result)),
            Err(e) => {
                reports.push(report_err(path, &e));
                first_error.get_or_insert(e);
            }
        }
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn report_ok(path: &Path, result: &LoadResult) -> serde_json::Value {
    json!({
        "file": path.display().to_string(),
        "valid": true,
        "phrases": result.config.phrases.len(),
        "timing": result.timing,
        "errors": [],
        "warnings": result.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn report_err(path: &Path, error: &ConfigError) -> serde_json::Value {
    let errors: Vec<String> = match error {
        ConfigError::ValidationError { errors, .. } => {
            errors.iter().map(ToString::to_string).collect()
        }
        other => vec![other.to_string()],
    };
    json!({
        "file": path.display().to_string(),
        "valid": false,
        "errors": errors,
        "warnings": [],
    })
}

fn print_human(report: &serde_json::Value) {
    let file = report["file"].as_str().unwrap_or("<unknown>");
    if report["valid"].as_bool().unwrap_or(false) {
        println!(
            "{file}: valid ({} phrases)",
            report["phrases"].as_u64().unwrap_or(0)
        );
    } else {
        println!("{file}: invalid");
    }
    for key in ["errors", "warnings"] {
        if let Some(items) = report[key].as_array() {
            for item in items.iter().filter_map(serde_json::Value::as_str) {
                println!("  {item}");
            }
        }
    }
}
