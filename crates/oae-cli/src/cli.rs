//! Command-line argument definitions.

use crate::actions::ConfigAction;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Sakai OAE acceptance runner.
///
/// Runs Gherkin scenarios that check access control, tagging, search and
/// user management on a live server.
#[derive(Parser, Debug)]
#[command(name = "oae-acceptance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty); defaults to the configured one
    #[arg(long = "format", global = true)]
    pub format: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run feature files against a server.
    ///
    /// The server comes from `--server`, then the `OAE_*` environment
    /// variables, then the configuration file.
    ///
    /// # Examples
    ///
    /// ```bash
    /// oae-acceptance run features/ --server http://localhost:8080
    /// oae-acceptance run features/search.feature --tag search --fail-fast
    /// ```
    Run {
        /// Feature file or directory
        #[arg(default_value = "features")]
        features: PathBuf,

        /// Base URL of the server under test
        #[arg(long, env = "OAE_SERVER_URL")]
        server: Option<String>,

        /// Run only scenarios with this tag (repeatable)
        #[arg(short, long = "tag", num_args = 1)]
        tags: Vec<String>,

        /// Stop at the first failed step
        #[arg(long)]
        fail_fast: bool,
    },

    /// List the step phrases feature files may use.
    Steps {
        /// Show only phrases containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
