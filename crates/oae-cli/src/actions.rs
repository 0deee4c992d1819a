//! Action type definitions for CLI commands.

use clap::Subcommand;

/// Configuration file actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init,

    /// Show the current configuration
    Show,

    /// Print one value
    Get {
        /// Key such as `server.url`
        key: String,
    },

    /// Change one value
    Set {
        /// Key such as `server.url`
        key: String,

        /// New value
        value: String,
    },
}
