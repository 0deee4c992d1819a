//! User and group management endpoints.

use crate::{Exchange, Expectation, Form, Session};
use oae_core::{GroupName, Result, User, UserName};

const USER_CREATE_PATH: &str = "/system/userManager/user.create.html";
const GROUP_CREATE_PATH: &str = "/system/userManager/group.create.html";
const CREATED: Expectation = Expectation::Below(300);

/// Creates and updates authorizables through `/system/userManager`.
///
/// Creation calls report a refusal as `Ok(None)`; only transport failures
/// are errors.
#[derive(Debug, Clone, Copy)]
pub struct UserManager<'a> {
    session: &'a Session,
}

impl<'a> UserManager<'a> {
    /// Creates a manager issuing requests through `session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Returns the form the server expects when creating `name`.
    #[must_use]
    pub fn user_form(&self, name: &UserName) -> Form {
        let password = self.session.config().test_password();
        Form::new()
            .field(":name", name)
            .field("pwd", password)
            .field("pwdConfirm", password)
            .field("firstName", name)
            .field("lastName", "Tester")
            .field("email", format!("{name}@sakai.invalid"))
            .field("_charset_", "UTF-8")
    }

    /// Creates a user with the shared test password.
    ///
    /// Returns the new identity if the server answered below 300, `None`
    /// if it refused.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn create_user(&self, name: &UserName) -> Result<Option<User>> {
        let url = self.session.url_for(USER_CREATE_PATH)?;
        let exchange = self.session.execute_post(url, &self.user_form(name)).await?;

        if CREATED.accepts(exchange.status()) {
            tracing::info!(user = %name, "Created user");
            Ok(Some(self.session.config().test_user(name.clone())))
        } else {
            tracing::info!(
                user = %name,
                status = exchange.status(),
                as_user = %self.session.get_user().name(),
                "Server refused to create user"
            );
            Ok(None)
        }
    }

    /// Creates a group.
    ///
    /// Returns the group name if the server answered below 300, `None` if it
    /// refused.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn create_group(&self, name: &GroupName) -> Result<Option<GroupName>> {
        let url = self.session.url_for(GROUP_CREATE_PATH)?;
        let form = Form::new().field(":name", name).field("_charset_", "UTF-8");
        let exchange = self.session.execute_post(url, &form).await?;

        if CREATED.accepts(exchange.status()) {
            tracing::info!(group = %name, "Created group");
            Ok(Some(name.clone()))
        } else {
            tracing::info!(
                group = %name,
                status = exchange.status(),
                "Server refused to create group"
            );
            Ok(None)
        }
    }

    /// Posts `form` to the group's update endpoint.
    ///
    /// The status is returned to the caller unchecked.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn update_group(&self, name: &GroupName, form: &Form) -> Result<Exchange> {
        let url = self.group_update_url(name)?;
        self.session.execute_post(url, form).await
    }

    /// Adds `member` to the group.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn add_member(&self, group: &GroupName, member: &UserName) -> Result<Exchange> {
        self.update_group(group, &Form::new().field(":member", member))
            .await
    }

    /// URL of `/system/userManager/group/{name}.update.html`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the base URL cannot carry a path.
    pub fn group_update_url(&self, name: &GroupName) -> Result<url::Url> {
        let leaf = format!("{name}.update.html");
        self.session
            .url_for_segments(&["system", "userManager", "group", &leaf])
    }
}
