//! HTTP test client for Sakai OAE servers.
//!
//! This crate talks to a running server the way the acceptance steps need
//! to: every request is issued as the session's *current user*, and that
//! user can be swapped for the duration of a scope.
//!
//! - [`Session`]: authenticated client, URL templating, GET and POST
//! - [`UserGuard`]: scoped identity switch that restores on drop
//! - [`Form`]: ordered form fields
//! - [`Exchange`]: response status and body with assertion helpers
//! - [`UserManager`] and [`FileManager`]: user, group and content helpers
//!
//! # Examples
//!
//! ```no_run
//! use oae_client::{Form, Session};
//! use oae_core::TargetConfig;
//!
//! # async fn example() -> oae_core::Result<()> {
//! let session = Session::new(&TargetConfig::from_env()?)?;
//! let url = session.url_for("/system/sparseupgrade")?;
//! let form = Form::new().field("dryRun", true).field("limit", 100);
//!
//! let exchange = session.execute_post(url, &form).await?;
//! exchange.expect_status(200, "Could not initiate upgrade process")?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod files;
mod form;
mod response;
mod session;
mod users;

pub use files::FileManager;
pub use form::Form;
pub use response::{Exchange, Expectation};
pub use session::{Session, UserGuard};
pub use users::UserManager;
