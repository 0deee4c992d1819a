//! Administrators group membership and privileged operations.

use crate::ScenarioContext;
use oae_client::{Exchange, Form, UserManager};
use oae_core::{GroupName, Result};

const ADMINISTRATORS: &str = "administrators";
const USER_CREATE_PATH: &str = "/system/userManager/user";
const UPGRADE_PATH: &str = "/system/sparseupgrade";

/// `"<user>" is a member of the administrators group`
///
/// Adds the user to `administrators` as the administrator.
///
/// # Errors
///
/// Fails if the server does not accept the update.
pub async fn add_to_administrators(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let member = ctx.user_name(user)?;
    let group = GroupName::new(ADMINISTRATORS)?;
    let admin = ctx.admin();

    let session = ctx.session.as_user(admin);
    UserManager::new(&session)
        .add_member(&group, &member)
        .await?
        .expect_success(format!("Unable to add {member} to {group}"))?;

    tracing::info!(user = %member, "Added to administrators");
    Ok(())
}

/// `Verify "<user>" can create a user`
///
/// # Errors
///
/// Fails unless the server answers 200.
pub async fn verify_can_create_user(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let actor = ctx.test_user(user)?;
    let form = Form::new()
        .field(":name", ctx.marker.qualify("newuser"))
        .field("pwd", "bogus pw")
        .field("pwdConfirm", "bogus pw")
        .field("additionalParam", "additional value")
        .field("_charset_", "utf-8");

    let session = ctx.session.as_user(actor);
    let url = session.url_for(USER_CREATE_PATH)?;
    session
        .execute_post(url, &form)
        .await?
        .expect_status(200, "Could not create user")?;
    Ok(())
}

async fn initiate_upgrade(ctx: &mut ScenarioContext, user: &str) -> Result<Exchange> {
    let actor = ctx.test_user(user)?;
    let form = Form::new().field("dryRun", true).field("limit", 100);

    let session = ctx.session.as_user(actor);
    let url = session.url_for(UPGRADE_PATH)?;
    session.execute_post(url, &form).await
}

/// `Verify "<user>" can initiate the upgrade process`
///
/// Requests a dry-run upgrade limited to 100 items.
///
/// # Errors
///
/// Fails unless the server answers 200.
pub async fn verify_can_initiate_upgrade(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    initiate_upgrade(ctx, user)
        .await?
        .expect_status(200, "Could not initiate upgrade process")?;
    Ok(())
}

/// `Verify "<user>" cannot initiate the upgrade process`
///
/// # Errors
///
/// Fails unless the server answers 403.
pub async fn verify_cannot_initiate_upgrade(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    initiate_upgrade(ctx, user)
        .await?
        .expect_status(403, "Should not be able to initiate upgrade process")?;
    Ok(())
}
