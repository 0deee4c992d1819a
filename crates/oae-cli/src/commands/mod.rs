//! CLI command implementations.
//!
//! Each module exposes an async `run` that returns the process exit code.

pub mod completions;
pub mod config;
pub mod run;
pub mod steps;
