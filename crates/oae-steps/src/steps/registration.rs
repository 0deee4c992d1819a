//! Self-registration of new users.
//!
//! The "try to create" steps store what the server answered instead of
//! checking it; later steps assert on the stored outcome.

use crate::{Registration, ScenarioContext};
use oae_client::{Expectation, Form, UserManager};
use oae_core::{Error, Result, User};

const CREATE_USER_SERVLET_CONFIG: &str = "/system/console/configMgr/org.sakaiproject.nakamura.user.lite.servlet.LiteCreateSakaiUserServlet";
const USER_CREATE_PATH: &str = "/system/userManager/user.create.html";

/// `User self-registration is enabled` / `User self-registration is disabled`
///
/// Applies the servlet configuration as the administrator, who stays the
/// current user afterwards.
///
/// # Errors
///
/// Fails unless the server answers below 400.
pub async fn set_self_registration(ctx: &mut ScenarioContext, enabled: bool) -> Result<()> {
    let form = Form::new()
        .field("action", "ajaxConfigManager")
        .field("apply", true)
        .field("self.registration.enabled", enabled)
        .field("propertylist", "self.registration.enabled");

    let admin = ctx.admin();
    ctx.session.switch_user(admin);

    let url = ctx.session.url_for(CREATE_USER_SERVLET_CONFIG)?;
    ctx.session
        .execute_post(url, &form)
        .await?
        .expect(Expectation::Below(400), "Unable to configure self-registration")?;

    tracing::info!(enabled, "Configured self-registration");
    Ok(())
}

/// `I try to create a new user`
///
/// Becomes anonymous for the rest of the scenario and tries to register a
/// user named `foo`.
///
/// # Errors
///
/// Fails only if no response was received; a refusal is recorded.
pub async fn try_create_user(ctx: &mut ScenarioContext) -> Result<()> {
    let name = ctx.user_name("foo")?;
    ctx.session.switch_user(User::anonymous());

    let created = UserManager::new(&ctx.session).create_user(&name).await?;
    ctx.registration = Some(created.map_or(Registration::Refused, Registration::Created));
    Ok(())
}

/// `I try to create a new user with captcha`
///
/// Becomes anonymous for the rest of the scenario and posts a reCAPTCHA
/// authenticated creation without a solved challenge.
///
/// # Errors
///
/// Fails only if no response was received.
pub async fn try_create_user_with_captcha(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.session.switch_user(User::anonymous());
    let form = Form::new().field(":create-auth", "reCAPTCHA.net");
    let status = try_create(ctx, &form).await?;
    tracing::info!(status, "Captcha registration answered");
    Ok(())
}

/// `I try to create a new user with no name`
///
/// # Errors
///
/// Fails only if no response was received.
pub async fn try_create_user_without_name(ctx: &mut ScenarioContext) -> Result<()> {
    let form = Form::new().field("pwd", "shhh").field("pwdConfirm", "shhh");
    try_create(ctx, &form).await.map(|_| ())
}

/// `I try to create a new user without password`
///
/// # Errors
///
/// Fails only if no response was received.
pub async fn try_create_user_without_password(ctx: &mut ScenarioContext) -> Result<()> {
    let form = Form::new()
        .field(":name", ctx.user_name("lucy")?)
        .field("pwdConfirm", "shhh");
    try_create(ctx, &form).await.map(|_| ())
}

/// `I try to create a new user without matching password confirmation`
///
/// # Errors
///
/// Fails only if no response was received.
pub async fn try_create_user_with_mismatched_password(ctx: &mut ScenarioContext) -> Result<()> {
    let form = Form::new()
        .field(":name", ctx.user_name("lucy")?)
        .field("pwd", "secret")
        .field("pwdConfirm", "shhh");
    try_create(ctx, &form).await.map(|_| ())
}

/// Posts a creation form as the current user and stores the response.
async fn try_create(ctx: &mut ScenarioContext, form: &Form) -> Result<u16> {
    let url = ctx.session.url_for(USER_CREATE_PATH)?;
    let exchange = ctx.session.execute_post(url, form).await?;
    let status = exchange.status();
    ctx.last_response = Some(exchange);
    Ok(status)
}

/// `a user named "<user>" exists`
///
/// Creates the user as the administrator.
///
/// # Errors
///
/// Fails if the server refuses to create the user.
pub async fn ensure_user(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let name = ctx.user_name(user)?;
    let admin = ctx.admin();

    let session = ctx.session.as_user(admin);
    match UserManager::new(&session).create_user(&name).await? {
        Some(_) => Ok(()),
        None => Err(Error::AssertionFailed {
            message: format!("could not create user {name}"),
        }),
    }
}

/// `the response status code is <N>`
///
/// # Errors
///
/// Fails if no response was stored or its status differs.
pub fn verify_response_status(ctx: &ScenarioContext, expected: u16) -> Result<()> {
    ctx.last_response()?
        .expect_status(expected, "Unexpected response to user creation")?;
    Ok(())
}

/// `the new user is created` / `the new user is not created`
///
/// # Errors
///
/// Fails if no attempt was made or the outcome differs.
pub fn verify_registration(ctx: &ScenarioContext, expect_created: bool) -> Result<()> {
    match (ctx.registration()?, expect_created) {
        (Registration::Created(_), true) | (Registration::Refused, false) => Ok(()),
        (Registration::Created(user), false) => Err(Error::AssertionFailed {
            message: format!("user {} was created but should not have been", user.name()),
        }),
        (Registration::Refused, true) => Err(Error::AssertionFailed {
            message: "user was not created".to_string(),
        }),
    }
}
