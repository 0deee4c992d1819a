//! Authenticated session against the server under test.

use crate::{Exchange, Form};
use oae_core::{Error, Result, TargetConfig, User};
use reqwest::header::REFERER;
use reqwest::{Client, RequestBuilder, redirect};
use std::ops::{Deref, DerefMut};
use url::Url;

/// HTTP client bound to one server and one current user.
///
/// A session starts as the configured administrator. Every request is sent
/// with the current user's Basic credentials (none for the anonymous user)
/// and with the `Referer` header the server's referrer filter requires for
/// POSTs. Redirects are not followed so steps observe the raw status.
///
/// # Examples
///
/// ```
/// use oae_client::Session;
/// use oae_core::{TargetConfig, User};
///
/// let mut session = Session::new(&TargetConfig::default()).unwrap();
/// assert_eq!(session.get_user().name().as_str(), "admin");
///
/// {
///     let guard = session.as_user(User::anonymous());
///     assert!(guard.get_user().is_anonymous());
/// }
/// assert_eq!(session.get_user().name().as_str(), "admin");
/// ```
#[derive(Debug)]
pub struct Session {
    client: Client,
    config: TargetConfig,
    user: User,
}

impl Session {
    /// Creates a session acting as the administrator.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the HTTP client cannot be built.
    pub fn new(config: &TargetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            config: config.clone(),
            user: config.admin_user(),
        })
    }

    /// Returns the configuration the session was built from.
    #[must_use]
    pub const fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Returns the user requests are currently issued as.
    #[must_use]
    pub const fn get_user(&self) -> &User {
        &self.user
    }

    /// Replaces the current user and returns the previous one.
    pub fn switch_user(&mut self, user: User) -> User {
        tracing::debug!(from = %self.user.name(), to = %user.name(), "Switching user");
        std::mem::replace(&mut self.user, user)
    }

    /// Acts as `user` until the returned guard is dropped.
    ///
    /// The previous user is restored when the guard goes out of scope,
    /// including on early return through `?`.
    pub fn as_user(&mut self, user: User) -> UserGuard<'_> {
        let previous = self.switch_user(user);
        UserGuard {
            session: self,
            previous: Some(previous),
        }
    }

    /// Resolves a server path against the base URL.
    ///
    /// A leading `/` is relative to the base URL, so a context path in the
    /// configured server URL is kept. The path is used as written; use
    /// [`Session::url_for_segments`] for values that need escaping.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the path does not form a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_client::Session;
    /// use oae_core::TargetConfig;
    ///
    /// let session = Session::new(&TargetConfig::default()).unwrap();
    /// let url = session.url_for("/system/batch").unwrap();
    /// assert_eq!(url.as_str(), "http://localhost:8080/system/batch");
    /// ```
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        self.config
            .server_url()
            .join(relative)
            .map_err(|e| Error::InvalidArgument(format!("invalid path '{path}': {e}")))
    }

    /// Builds a URL from raw path segments, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the base URL cannot carry a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use oae_client::Session;
    /// use oae_core::TargetConfig;
    ///
    /// let session = Session::new(&TargetConfig::default()).unwrap();
    /// let url = session
    ///     .url_for_segments(&["system", "userManager", "group", "a b.update.html"])
    ///     .unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "http://localhost:8080/system/userManager/group/a%20b.update.html"
    /// );
    /// ```
    pub fn url_for_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.server_url().clone();
        url.path_segments_mut()
            .map_err(|()| Error::ConfigError {
                message: format!("server url '{}' cannot be a base url", self.config.server_url()),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolves a path and appends URL-encoded query pairs in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the path does not form a valid URL.
    pub fn url_for_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.url_for(path)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// Sends a GET request as the current user.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn execute_get(&self, url: Url) -> Result<Exchange> {
        let request = self.client.get(url.clone());
        self.send("GET", url, request).await
    }

    /// Sends a URL-encoded form POST as the current user.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn execute_post(&self, url: Url, form: &Form) -> Result<Exchange> {
        let request = self.client.post(url.clone()).form(form.fields());
        self.send("POST", url, request).await
    }

    /// Sends a multipart POST carrying one file as the current user.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `mime` is not a valid media type,
    /// or `Error::RequestFailed` if no response was received.
    pub async fn execute_file_post(
        &self,
        url: Url,
        field: &str,
        filename: &str,
        data: Vec<u8>,
        mime: &str,
    ) -> Result<Exchange> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| Error::InvalidArgument(format!("invalid mime type '{mime}': {e}")))?;
        let multipart = reqwest::multipart::Form::new().part(field.to_string(), part);

        let request = self.client.post(url.clone()).multipart(multipart);
        self.send("POST", url, request).await
    }

    async fn send(&self, method: &'static str, url: Url, request: RequestBuilder) -> Result<Exchange> {
        let request = match self.user.basic_credentials() {
            Some((name, password)) => request.basic_auth(name, Some(password)),
            None => request,
        };

        let response = request
            .header(REFERER, self.config.referer())
            .send()
            .await
            .map_err(|e| request_failed(method, &url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| request_failed(method, &url, e))?;

        tracing::debug!(
            method,
            url = %url,
            user = %self.user.name(),
            status,
            "HTTP exchange"
        );

        Ok(Exchange::new(method, url, status, body))
    }
}

fn request_failed(method: &str, url: &Url, source: reqwest::Error) -> Error {
    Error::RequestFailed {
        method: method.to_string(),
        url: url.to_string(),
        source: Box::new(source),
    }
}

/// Scoped identity switch returned by [`Session::as_user`].
///
/// Dereferences to the [`Session`], so requests are issued through the
/// guard. Dropping it restores the user that was current before.
#[derive(Debug)]
pub struct UserGuard<'a> {
    session: &'a mut Session,
    previous: Option<User>,
}

impl Deref for UserGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for UserGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.session.switch_user(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oae_core::UserName;

    fn session() -> Session {
        Session::new(&TargetConfig::default()).unwrap()
    }

    fn user(name: &str) -> User {
        User::from_name(name, "testuser").unwrap()
    }

    #[test]
    fn test_starts_as_admin() {
        let session = session();
        assert_eq!(session.get_user().name().as_str(), "admin");
        assert!(!session.get_user().is_anonymous());
    }

    #[test]
    fn test_switch_user_returns_previous() {
        let mut session = session();
        let previous = session.switch_user(user("bob-1"));
        assert_eq!(previous.name().as_str(), "admin");
        assert_eq!(session.get_user().name().as_str(), "bob-1");
    }

    #[test]
    fn test_nested_guards_restore_in_order() {
        let mut session = session();
        {
            let mut outer = session.as_user(user("alice-1"));
            {
                let inner = outer.as_user(User::anonymous());
                assert!(inner.get_user().is_anonymous());
            }
            assert_eq!(outer.get_user().name().as_str(), "alice-1");
        }
        assert_eq!(session.get_user().name().as_str(), "admin");
    }

    #[test]
    fn test_guard_restores_after_error() {
        fn failing(session: &mut Session) -> Result<()> {
            let guard = session.as_user(user("carol-1"));
            assert_eq!(guard.get_user().name().as_str(), "carol-1");
            Err(Error::AssertionFailed {
                message: "boom".to_string(),
            })
        }

        let mut session = session();
        assert!(failing(&mut session).is_err());
        assert_eq!(session.get_user().name().as_str(), "admin");
    }

    #[test]
    fn test_url_for_keeps_context_path() {
        let config = TargetConfig::builder()
            .server_url("http://oae.example.edu/nakamura")
            .build()
            .unwrap();
        let session = Session::new(&config).unwrap();

        let url = session.url_for("/p/abc.activity.json").unwrap();
        assert_eq!(url.as_str(), "http://oae.example.edu/nakamura/p/abc.activity.json");

        let url = session.url_for_segments(&["p", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://oae.example.edu/nakamura/p/abc");
    }

    #[test]
    fn test_url_for_segments_escapes() {
        let session = session();
        let url = session.url_for_segments(&["tags", "a?b#c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/tags/a%3Fb%23c");
    }

    #[test]
    fn test_url_for_query_encodes_pairs() {
        let session = session();
        let url = session
            .url_for_query("/var/search/general.json", &[("q", "a b&c"), ("tags", "")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/var/search/general.json?q=a+b%26c&tags="
        );
    }

    #[test]
    fn test_test_user_identity() {
        let session = session();
        let bob = session
            .config()
            .test_user(UserName::new("bob-7").unwrap());
        assert_eq!(bob.basic_credentials(), Some(("bob-7", "testuser")));
    }
}
