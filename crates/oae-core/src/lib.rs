//! Core types, configuration, and errors for OAE acceptance testing.
//!
//! This crate provides the foundational types shared by the HTTP test
//! client, the step catalog, and the command-line runner.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`UserName`, `GroupName`, `PoolId`, `TagName`, `RunMarker`)
//! - User identities with their credentials (`User`)
//! - Error hierarchy with contextual information
//! - Target server configuration (`TargetConfig`)
//! - CLI value types (`cli::OutputFormat`, `cli::ExitCode`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;
mod user;

pub mod cli;

pub use config::{TargetConfig, TargetConfigBuilder, env};
pub use error::{Error, Result};
pub use types::{GroupName, PoolId, RunMarker, TagName, UserName};
pub use user::User;
