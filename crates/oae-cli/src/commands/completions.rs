//! Shell completion generation command.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use oae_core::cli::ExitCode;
use std::io::{self, Write};

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Prints the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```bash
/// oae-acceptance completions bash > /etc/bash_completion.d/oae-acceptance
/// ```
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    tracing::info!("Generating {shell} completions");
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
