//! Run command implementation.
//!
//! Resolves the target server, installs it for the step catalog and runs
//! the feature files one scenario at a time.

use crate::commands::config::{self, ServerConfig};
use anyhow::Result;
use chrono::{DateTime, Utc};
use oae_core::cli::{ExitCode, OutputFormat};
use oae_core::{TargetConfig, env};
use oae_steps::runner::{self, RunOptions, RunSummary};
use serde::Serialize;
use std::path::PathBuf;

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Server the scenarios ran against
    pub server: String,
    /// Feature file or directory
    pub features: String,
    /// Tags the run was restricted to
    pub tags: Vec<String>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration
    pub duration_ms: i64,
    /// Step counts
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Resolves the target server.
///
/// Each setting comes from the first source that has it: the `--server`
/// flag (URL only), then `lookup` (the process environment in production),
/// then the configuration file.
///
/// # Errors
///
/// Returns `Error::ConfigError` if the merged values are invalid.
pub fn resolve_target<F>(
    server: Option<String>,
    file: ServerConfig,
    lookup: F,
) -> oae_core::Result<TargetConfig>
where
    F: Fn(&str) -> Option<String>,
{
    TargetConfig::from_lookup(move |key| {
        if key == env::SERVER_URL && server.is_some() {
            return server.clone();
        }
        lookup(key).or_else(|| file.lookup(key))
    })
}

/// Runs the feature files.
///
/// Returns `ExitCode::SCENARIOS_FAILED` if any step failed,
/// `ExitCode::CONFIG_ERROR` if the target cannot be resolved and
/// `ExitCode::INVALID_INPUT` if `features` does not exist.
pub async fn run(
    features: PathBuf,
    server: Option<String>,
    tags: Vec<String>,
    fail_fast: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    if !features.exists() {
        tracing::error!(features = %features.display(), "Feature path does not exist");
        return Ok(ExitCode::INVALID_INPUT);
    }

    let resolved = config::load_config().and_then(|file| {
        resolve_target(server, file.server, |key| std::env::var(key).ok())
            .map_err(anyhow::Error::from)
    });
    let target = match resolved {
        Ok(target) => target,
        Err(e) => {
            tracing::error!("Cannot resolve the target server: {e:#}");
            return Ok(ExitCode::CONFIG_ERROR);
        }
    };

    let server_url = target.server_url().to_string();
    tracing::info!(server = %server_url, "Target server");
    if !oae_steps::install_target(target) {
        tracing::warn!("A target was already installed; keeping it");
    }

    let options = RunOptions {
        features,
        tags,
        fail_fast,
    };

    let started_at = Utc::now();
    let summary = runner::run_features(&options).await;
    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    let report = RunReport {
        server: server_url,
        features: options.features.display().to_string(),
        tags: options.tags,
        started_at,
        duration_ms,
        summary,
    };
    println!("{}", crate::formatters::format_report(&report, output_format)?);

    Ok(if report.summary.failed {
        ExitCode::SCENARIOS_FAILED
    } else {
        ExitCode::SUCCESS
    })
}
