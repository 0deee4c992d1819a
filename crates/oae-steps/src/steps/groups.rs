//! Group creation, membership and group properties.

use crate::ScenarioContext;
use oae_client::{Exchange, Form, UserManager};
use oae_core::{Error, Result};

/// `A group named "<group>" exists`
///
/// Creates the group as the current user.
///
/// # Errors
///
/// Fails if the server refuses to create the group.
pub async fn ensure_group(ctx: &mut ScenarioContext, group: &str) -> Result<()> {
    let name = ctx.group_name(group)?;
    match UserManager::new(&ctx.session).create_group(&name).await? {
        Some(_) => Ok(()),
        None => Err(Error::AssertionFailed {
            message: format!("could not create group {name}"),
        }),
    }
}

/// `I add member "<user>" to Group "<group>"`
///
/// Adds the member as the current user.
///
/// # Errors
///
/// Fails unless the server answers 2xx.
pub async fn add_member(ctx: &mut ScenarioContext, user: &str, group: &str) -> Result<()> {
    let member = ctx.user_name(user)?;
    let group = ctx.group_name(group)?;

    UserManager::new(&ctx.session)
        .add_member(&group, &member)
        .await?
        .expect_success(format!("could not add {member} to {group}"))?;
    Ok(())
}

async fn add_member_as(
    ctx: &mut ScenarioContext,
    actor: &str,
    user: &str,
    group: &str,
) -> Result<Exchange> {
    let actor = ctx.test_user(actor)?;
    let member = ctx.user_name(user)?;
    let group = ctx.group_name(group)?;

    let session = ctx.session.as_user(actor);
    UserManager::new(&session).add_member(&group, &member).await
}

/// `Verify "<actor>" can add member "<user>" to Group "<group>"`
///
/// # Errors
///
/// Fails unless the server answers 200.
pub async fn verify_can_add_member(
    ctx: &mut ScenarioContext,
    actor: &str,
    user: &str,
    group: &str,
) -> Result<()> {
    add_member_as(ctx, actor, user, group)
        .await?
        .expect_status(200, format!("{actor} could not add {user} to {group}"))?;
    Ok(())
}

/// `Verify "<actor>" cannot add member "<user>" to Group "<group>"`
///
/// # Errors
///
/// Fails unless the server answers 403.
pub async fn verify_cannot_add_member(
    ctx: &mut ScenarioContext,
    actor: &str,
    user: &str,
    group: &str,
) -> Result<()> {
    add_member_as(ctx, actor, user, group)
        .await?
        .expect_status(
            403,
            format!("{actor} should not be able to add {user} to {group}"),
        )?;
    Ok(())
}

/// Updates a group as the administrator. The administrator stays the
/// current user afterwards.
async fn update_as_admin(ctx: &mut ScenarioContext, group: &str, form: &Form) -> Result<()> {
    let group = ctx.group_name(group)?;
    let admin = ctx.admin();
    ctx.session.switch_user(admin);

    UserManager::new(&ctx.session)
        .update_group(&group, form)
        .await?
        .expect_success(format!("Unable to update group {group}"))?;
    Ok(())
}

/// `the Group "<group>" is a Collection`
///
/// Marks the group as a collection pseudo-group.
///
/// # Errors
///
/// Fails unless the server answers 2xx.
pub async fn make_collection(ctx: &mut ScenarioContext, group: &str) -> Result<()> {
    let form = Form::new()
        .field("sakai:pseudoGroup", true)
        .field("sakai:category", "collection");
    update_as_admin(ctx, group, &form).await
}

/// `the Group "<managers>" is the managers group of the Group "<group>"`
///
/// # Errors
///
/// Fails unless the server answers 2xx.
pub async fn set_managers_group(
    ctx: &mut ScenarioContext,
    managers: &str,
    group: &str,
) -> Result<()> {
    let managers = ctx.group_name(managers)?;
    let form = Form::new().field("sakai:managers-group", managers);
    update_as_admin(ctx, group, &form).await
}
