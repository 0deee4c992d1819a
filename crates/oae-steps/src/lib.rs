//! Cucumber step catalog for Sakai OAE acceptance scenarios.
//!
//! Feature files describe what users may do on a running server; the steps
//! in this crate carry those phrases out over HTTP and fail when the server
//! answers otherwise.
//!
//! # Architecture
//!
//! - [`OaeWorld`] is the cucumber world; it owns a [`ScenarioContext`]
//!   with the session, the run marker and what earlier steps produced.
//! - [`steps`] holds the logic of every phrase, grouped by concern. Each
//!   function returns `Result` and can be called without cucumber.
//! - [`catalog`] binds the phrases to cucumber and lists them.
//! - [`payloads`] and [`search`] build request bodies and read responses.
//! - [`runner`] executes feature files.
//!
//! # Examples
//!
//! ```no_run
//! use oae_core::TargetConfig;
//! use oae_steps::runner::{run_features, RunOptions};
//!
//! # async fn example() -> oae_core::Result<()> {
//! oae_steps::install_target(TargetConfig::from_env()?);
//! let summary = run_features(&RunOptions::new("features")).await;
//! assert!(!summary.failed);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod catalog;
pub mod payloads;
pub mod runner;
pub mod search;
pub mod steps;

mod world;

pub use world::{OaeWorld, Registration, ScenarioContext, install_target};
