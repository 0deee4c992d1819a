//! `oae-acceptance`: runs Sakai OAE acceptance scenarios.
//!
//! # Examples
//!
//! ```bash
//! # Run every feature against a local server
//! oae-acceptance run features/ --server http://localhost:8080
//!
//! # List the phrases about groups
//! oae-acceptance steps --filter group
//! ```

use anyhow::Result;
use clap::Parser;
use oae_cli::cli::Cli;
use oae_cli::commands::config;
use oae_cli::runner::{execute_command, init_logging};
use oae_core::cli::OutputFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file must not prevent `config set` from repairing it.
    let (general, load_error) = match config::load_config() {
        Ok(config) => (config.general, None),
        Err(e) => (config::GeneralConfig::default(), Some(e)),
    };

    init_logging(cli.verbose, &general.log_level)?;
    if let Some(e) = load_error {
        tracing::warn!("Ignoring configuration file: {e:#}");
    }

    let output_format = cli
        .format
        .as_deref()
        .unwrap_or(&general.default_format)
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format).await?;

    std::process::exit(exit_code.as_i32());
}
