//! Target server configuration.
//!
//! Describes which server the suite talks to, how the administrator and
//! the generated test users authenticate, and the timing knobs of a run.
//!
//! # Examples
//!
//! ```
//! use oae_core::TargetConfig;
//! use std::time::Duration;
//!
//! // Use default configuration
//! let config = TargetConfig::default();
//! assert_eq!(config.server_url().as_str(), "http://localhost:8080/");
//!
//! // Create custom configuration
//! let custom = TargetConfig::builder()
//!     .server_url("http://oae.example.edu:8080")
//!     .index_wait(Duration::from_millis(250))
//!     .build()
//!     .unwrap();
//! assert_eq!(custom.index_wait(), Duration::from_millis(250));
//! ```

use crate::{Error, Result, User, UserName};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";
const DEFAULT_ADMIN_NAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_TEST_PASSWORD: &str = "testuser";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INDEX_WAIT_MS: u64 = 1000;

/// Environment variables read by [`TargetConfig::from_env`].
pub mod env {
    /// Base URL of the server under test.
    pub const SERVER_URL: &str = "OAE_SERVER_URL";
    /// Administrator account name.
    pub const ADMIN_USER: &str = "OAE_ADMIN_USER";
    /// Administrator password.
    pub const ADMIN_PASSWORD: &str = "OAE_ADMIN_PASSWORD";
    /// Password given to every user the suite creates.
    pub const TEST_PASSWORD: &str = "OAE_TEST_PASSWORD";
    /// Per-request timeout in seconds.
    pub const TIMEOUT_SECS: &str = "OAE_TIMEOUT_SECS";
    /// Delay after indexing-sensitive writes, in milliseconds.
    pub const INDEX_WAIT_MS: &str = "OAE_INDEX_WAIT_MS";
}

/// Configuration of the server under test.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    server_url: Url,
    admin_name: UserName,
    admin_password: SecretString,
    test_password: SecretString,
    request_timeout: Duration,
    index_wait: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            admin_name: UserName::trusted(DEFAULT_ADMIN_NAME),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD.to_string()),
            test_password: SecretString::from(DEFAULT_TEST_PASSWORD.to_string()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            index_wait: Duration::from_millis(DEFAULT_INDEX_WAIT_MS),
        }
    }
}

fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER_URL).unwrap_or_else(|_| unreachable!("default server url is valid"))
}

impl TargetConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> TargetConfigBuilder {
        TargetConfigBuilder::new()
    }

    /// Builds a configuration from the `OAE_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// [`TargetConfig::from_env`] is this function over the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a value is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_core::TargetConfig;
    ///
    /// let config = TargetConfig::from_lookup(|key| match key {
    ///     "OAE_SERVER_URL" => Some("http://127.0.0.1:9090".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.server_url().as_str(), "http://127.0.0.1:9090/");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(url) = lookup(env::SERVER_URL) {
            builder = builder.server_url(url);
        }
        if let Some(name) = lookup(env::ADMIN_USER) {
            builder = builder.admin_name(name);
        }
        if let Some(password) = lookup(env::ADMIN_PASSWORD) {
            builder = builder.admin_password(password);
        }
        if let Some(password) = lookup(env::TEST_PASSWORD) {
            builder = builder.test_password(password);
        }
        if let Some(secs) = lookup(env::TIMEOUT_SECS) {
            let secs = parse_number(env::TIMEOUT_SECS, &secs)?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(millis) = lookup(env::INDEX_WAIT_MS) {
            let millis = parse_number(env::INDEX_WAIT_MS, &millis)?;
            builder = builder.index_wait(Duration::from_millis(millis));
        }

        builder.build()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The server URL is not `http` or `https`, or cannot carry a path
    /// - The request timeout is zero
    /// - Either password is empty
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.server_url.scheme(), "http" | "https") {
            return Err(Error::ConfigError {
                message: format!(
                    "server url must use http or https, got '{}'",
                    self.server_url.scheme()
                ),
            });
        }

        if self.server_url.cannot_be_a_base() {
            return Err(Error::ConfigError {
                message: format!("server url '{}' cannot be a base url", self.server_url),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(Error::ConfigError {
                message: "request timeout must be greater than zero".to_string(),
            });
        }

        if self.admin_password.expose_secret().is_empty() {
            return Err(Error::ConfigError {
                message: "admin password cannot be empty".to_string(),
            });
        }

        if self.test_password.expose_secret().is_empty() {
            return Err(Error::ConfigError {
                message: "test user password cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the base URL of the server, always ending in `/`.
    #[must_use]
    pub const fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Returns the administrator identity.
    #[must_use]
    pub fn admin_user(&self) -> User {
        User::new(
            self.admin_name.clone(),
            self.admin_password.expose_secret(),
        )
    }

    /// Returns an identity for a user the suite created, authenticated with
    /// the shared test password.
    #[must_use]
    pub fn test_user(&self, name: UserName) -> User {
        User::new(name, self.test_password.expose_secret())
    }

    /// Returns the password given to every user the suite creates.
    #[must_use]
    pub fn test_password(&self) -> &str {
        self.test_password.expose_secret()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the delay observed after writes the search index must see.
    #[must_use]
    pub const fn index_wait(&self) -> Duration {
        self.index_wait
    }

    /// Returns the `Referer` value the server's referrer filter accepts.
    #[must_use]
    pub fn referer(&self) -> String {
        format!(
            "{}/dev/integrationtests",
            self.server_url.as_str().trim_end_matches('/')
        )
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| Error::ConfigError {
        message: format!("{key} must be a non-negative integer, got '{value}'"),
    })
}

/// Builder for [`TargetConfig`].
///
/// Values are checked when [`TargetConfigBuilder::build`] is called.
#[derive(Debug, Default)]
pub struct TargetConfigBuilder {
    server_url: Option<String>,
    admin_name: Option<String>,
    admin_password: Option<String>,
    test_password: Option<String>,
    request_timeout: Option<Duration>,
    index_wait: Option<Duration>,
}

impl TargetConfigBuilder {
    /// Creates a builder with every value at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server base URL.
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Sets the administrator account name.
    #[must_use]
    pub fn admin_name(mut self, name: impl Into<String>) -> Self {
        self.admin_name = Some(name.into());
        self
    }

    /// Sets the administrator password.
    #[must_use]
    pub fn admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = Some(password.into());
        self
    }

    /// Sets the password for users the suite creates.
    #[must_use]
    pub fn test_password(mut self, password: impl Into<String>) -> Self {
        self.test_password = Some(password.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the delay after indexing-sensitive writes.
    #[must_use]
    pub const fn index_wait(mut self, wait: Duration) -> Self {
        self.index_wait = Some(wait);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the URL does not parse or the
    /// resulting configuration fails [`TargetConfig::validate`].
    pub fn build(self) -> Result<TargetConfig> {
        let defaults = TargetConfig::default();

        let server_url = match self.server_url {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.server_url,
        };

        let admin_name = match self.admin_name {
            Some(name) => UserName::new(name).map_err(|e| Error::ConfigError {
                message: format!("invalid admin user: {e}"),
            })?,
            None => defaults.admin_name,
        };

        let config = TargetConfig {
            server_url,
            admin_name,
            admin_password: self
                .admin_password
                .map_or(defaults.admin_password, SecretString::from),
            test_password: self
                .test_password
                .map_or(defaults.test_password, SecretString::from),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            index_wait: self.index_wait.unwrap_or(defaults.index_wait),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parses a base URL, appending a trailing `/` so relative joins keep any
/// context path (`http://host/oae` + `p/x` = `http://host/oae/p/x`).
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| Error::ConfigError {
        message: format!("invalid server url '{raw}': {e}"),
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
