//! User identities the session can act as.

use crate::{Result, UserName};
use secrecy::{ExposeSecret, SecretString};

/// An identity requests are issued under.
///
/// Users with a password authenticate with HTTP Basic credentials; the
/// anonymous user sends none. Passwords are kept in a [`SecretString`] so they
/// never end up in `Debug` output or logs.
///
/// # Examples
///
/// ```
/// use oae_core::{User, UserName};
///
/// let admin = User::new(UserName::new("admin").unwrap(), "admin");
/// assert!(!admin.is_anonymous());
/// assert_eq!(admin.basic_credentials(), Some(("admin", "admin")));
///
/// let anon = User::anonymous();
/// assert!(anon.is_anonymous());
/// assert_eq!(anon.basic_credentials(), None);
/// ```
#[derive(Debug, Clone)]
pub struct User {
    name: UserName,
    password: Option<SecretString>,
}

impl User {
    /// Creates an authenticated user.
    #[must_use]
    pub fn new(name: UserName, password: impl Into<String>) -> Self {
        Self {
            name,
            password: Some(SecretString::from(password.into())),
        }
    }

    /// Returns the anonymous identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            name: UserName::anonymous(),
            password: None,
        }
    }

    /// Creates an authenticated user from a raw name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the name is invalid.
    pub fn from_name(name: &str, password: impl Into<String>) -> Result<Self> {
        Ok(Self::new(UserName::new(name)?, password))
    }

    /// Returns the user's name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns `true` if requests are sent without credentials.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.password.is_none()
    }

    /// Returns the `(name, password)` pair for HTTP Basic authentication.
    #[must_use]
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        self.password
            .as_ref()
            .map(|password| (self.name.as_str(), password.expose_secret()))
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.is_anonymous() == other.is_anonymous()
    }
}

impl Eq for User {}
