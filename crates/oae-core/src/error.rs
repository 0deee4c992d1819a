//! Error types for OAE acceptance testing.
//!
//! Every failure a step can report is one of these variants. The policy is
//! deliberately shallow: a failed request, an unexpected status code, and a
//! missing search hit all end the step the same way.
//!
//! # Examples
//!
//! ```
//! use oae_core::{Error, Result};
//!
//! fn check_status(actual: u16) -> Result<()> {
//!     if actual != 200 {
//!         return Err(Error::UnexpectedStatus {
//!             expected: "200".to_string(),
//!             actual,
//!             message: "Unable to view document".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_status(404).unwrap_err();
//! assert!(err.is_unexpected_status());
//! assert_eq!(err.status(), Some(404));
//! ```

use thiserror::Error;

/// Main error type for OAE acceptance testing.
///
/// All errors in the workspace use this type, so a step can bubble up a
/// transport failure and an assertion failure through the same `?`.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request could not be completed.
    ///
    /// Raised on connection refusal, timeouts, and body read failures. The
    /// server never produced a status code.
    #[error("{method} {url} failed")]
    RequestFailed {
        /// HTTP method of the failed request
        method: String,
        /// Target URL of the failed request
        url: String,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a status code the step did not expect.
    #[error("{message} (expected status {expected}, got {actual})")]
    UnexpectedStatus {
        /// Human-readable description of the accepted statuses
        expected: String,
        /// Status code the server returned
        actual: u16,
        /// Description of what the step was trying to do
        message: String,
    },

    /// The response body did not have the documented shape.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the body
        message: String,
        /// Underlying JSON error, when the body failed to parse
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A content assertion failed (a document was or was not found, a user
    /// was or was not created).
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Description of the failed expectation
        message: String,
    },

    /// A step needs state that no earlier step in the scenario produced.
    #[error("Missing scenario context: {what}")]
    MissingContext {
        /// The missing piece of state
        what: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation error for domain types.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },
}

impl Error {
    /// Returns `true` if the request never produced a response.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_core::Error;
    ///
    /// let err = Error::RequestFailed {
    ///     method: "GET".to_string(),
    ///     url: "http://localhost:8080/p/abc".to_string(),
    ///     source: "connection refused".into(),
    /// };
    /// assert!(err.is_request_failure());
    /// ```
    #[must_use]
    pub const fn is_request_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Returns `true` if this is a status code mismatch.
    #[must_use]
    pub const fn is_unexpected_status(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. })
    }

    /// Returns `true` if this is a content assertion failure.
    #[must_use]
    pub const fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "server url must use http or https".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a validation error.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Returns the HTTP status carried by an `UnexpectedStatus` error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

/// Result type alias for OAE acceptance operations.
pub type Result<T> = std::result::Result<T, Error>;
