//! Server responses and status assertions.

use oae_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

/// Accepted status codes for an assertion.
///
/// # Examples
///
/// ```
/// use oae_client::Expectation;
///
/// assert!(Expectation::Exactly(201).accepts(201));
/// assert!(Expectation::Not(200).accepts(403));
/// assert!(Expectation::Success.accepts(204));
/// assert!(!Expectation::Success.accepts(302));
/// assert!(Expectation::Below(400).accepts(302));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Only this status is accepted.
    Exactly(u16),
    /// Any status except this one.
    Not(u16),
    /// Any 2xx status.
    Success,
    /// Any status below this one.
    Below(u16),
}

impl Expectation {
    /// Returns `true` if `status` satisfies the expectation.
    #[must_use]
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Self::Exactly(expected) => status == expected,
            Self::Not(forbidden) => status != forbidden,
            Self::Success => (200..300).contains(&status),
            Self::Below(limit) => status < limit,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(status) => write!(f, "{status}"),
            Self::Not(status) => write!(f, "anything but {status}"),
            Self::Success => f.write_str("2xx"),
            Self::Below(limit) => write!(f, "below {limit}"),
        }
    }
}

/// A completed request: what was asked and what the server answered.
#[derive(Debug, Clone)]
pub struct Exchange {
    method: &'static str,
    url: Url,
    status: u16,
    body: String,
}

impl Exchange {
    /// Wraps a response that has already been read.
    #[must_use]
    pub const fn new(method: &'static str, url: Url, status: u16, body: String) -> Self {
        Self {
            method,
            url,
            status,
            body,
        }
    }

    /// URL the request was sent to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response body as text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Checks the status against an expectation.
    ///
    /// On mismatch the status code, the body and `message` are logged at
    /// `error` level before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` if the status is not accepted.
    pub fn expect(&self, expectation: Expectation, message: impl Into<String>) -> Result<&Self> {
        if expectation.accepts(self.status) {
            return Ok(self);
        }

        let message = message.into();
        tracing::error!(
            method = self.method,
            url = %self.url,
            status = self.status,
            body = %self.body,
            "{message}"
        );

        Err(Error::UnexpectedStatus {
            expected: expectation.to_string(),
            actual: self.status,
            message,
        })
    }

    /// Requires exactly `expected`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` on any other status.
    pub fn expect_status(&self, expected: u16, message: impl Into<String>) -> Result<&Self> {
        self.expect(Expectation::Exactly(expected), message)
    }

    /// Requires any status except `forbidden`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` if the status equals `forbidden`.
    pub fn expect_not_status(&self, forbidden: u16, message: impl Into<String>) -> Result<&Self> {
        self.expect(Expectation::Not(forbidden), message)
    }

    /// Requires any 2xx status.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` on a non-2xx status.
    pub fn expect_success(&self, message: impl Into<String>) -> Result<&Self> {
        self.expect(Expectation::Success, message)
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` if the body is not JSON of shape `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| Error::InvalidResponse {
            message: format!(
                "{} {} returned a body that is not the expected JSON",
                self.method, self.url
            ),
            source: Some(e),
        })
    }
}
