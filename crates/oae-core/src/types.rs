//! Strong domain types for OAE acceptance testing.
//!
//! Names typed in a feature file ("bob", "math-101") are never sent to the
//! server as-is: each scenario qualifies them with its [`RunMarker`] so that
//! repeated runs against the same server never collide.
//!
//! # Examples
//!
//! ```
//! use oae_core::{RunMarker, UserName};
//!
//! let marker = RunMarker::new("1700000000123456").unwrap();
//! let bob = marker.user("bob").unwrap();
//! assert_eq!(bob.as_str(), "bob-1700000000123456");
//! assert_ne!(bob, UserName::new("bob").unwrap());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejects values that cannot be embedded in a URL path segment or form field.
fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    if value.chars().any(char::is_control) {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "cannot contain control characters".to_string(),
        });
    }

    if value.contains('/') {
        return Err(Error::ValidationError {
            field: field.to_string(),
            reason: "cannot contain '/'".to_string(),
        });
    }

    Ok(())
}

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a validated name.
            ///
            /// # Errors
            ///
            /// Returns `Error::ValidationError` if the value is empty, contains
            /// control characters, or contains `/`.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                validate_name($field, &value)?;
                Ok(Self(value))
            }

            /// Returns the name as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the name and returns the inner `String`.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

name_type!(
    /// Authorizable identifier of a user on the server.
    UserName,
    "user_name"
);

name_type!(
    /// Authorizable identifier of a group on the server.
    GroupName,
    "group_name"
);

name_type!(
    /// Tag name, stored on the server under `/tags/{name}`.
    TagName,
    "tag_name"
);

impl UserName {
    /// Name the server gives to unauthenticated requests.
    pub(crate) fn anonymous() -> Self {
        Self::trusted("anonymous")
    }

    /// Wraps a compile-time constant known to be valid.
    pub(crate) fn trusted(value: &'static str) -> Self {
        Self(value.to_string())
    }
}

/// Server-assigned identifier of a pooled content item.
///
/// Pool ids are opaque; the client only reads them from creation responses
/// and splices them into `/p/{poolId}` URLs.
///
/// # Examples
///
/// ```
/// use oae_core::PoolId;
///
/// let id = PoolId::new("gPkr4AZhaa").unwrap();
/// assert_eq!(id.content_path(), "/p/gPkr4AZhaa");
/// assert!(PoolId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(String);

impl PoolId {
    /// Creates a pool id from a server response value.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the id is empty or would escape
    /// the `/p/` namespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_name("pool_id", &id)?;
        Ok(Self(id))
    }

    /// Returns the pool id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the content path of the item, `/p/{poolId}`.
    #[must_use]
    pub fn content_path(&self) -> String {
        format!("/p/{}", self.0)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-scenario suffix that makes server-side identifiers unique.
///
/// Generated from the current UTC time in microseconds, which is unique
/// enough for sequential scenarios against one server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunMarker(String);

impl RunMarker {
    /// Creates a marker from an explicit value.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the value is empty or contains
    /// characters other than ASCII alphanumerics.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::ValidationError {
                field: "run_marker".to_string(),
                reason: "must be non-empty and ASCII alphanumeric".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Generates a fresh marker from the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self(chrono::Utc::now().timestamp_micros().to_string())
    }

    /// Returns the marker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends the marker to a name: `"{name}-{marker}"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_core::RunMarker;
    ///
    /// let marker = RunMarker::new("42").unwrap();
    /// assert_eq!(marker.qualify("document"), "document-42");
    /// ```
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        format!("{name}-{}", self.0)
    }

    /// Qualifies a user name typed in a feature file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if `name` is not a valid user name.
    pub fn user(&self, name: &str) -> Result<UserName> {
        validate_name("user_name", name)?;
        UserName::new(self.qualify(name))
    }

    /// Qualifies a group name typed in a feature file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if `name` is not a valid group name.
    pub fn group(&self, name: &str) -> Result<GroupName> {
        validate_name("group_name", name)?;
        GroupName::new(self.qualify(name))
    }

    /// Qualifies a tag typed in a feature file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if `name` is not a valid tag.
    pub fn tag(&self, name: &str) -> Result<TagName> {
        validate_name("tag_name", name)?;
        TagName::new(self.qualify(name))
    }
}

impl fmt::Display for RunMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
