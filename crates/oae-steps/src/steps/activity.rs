//! Activity records on the private document.

use crate::ScenarioContext;
use oae_client::{Exchange, Form};
use oae_core::Result;

fn activity_form() -> Form {
    Form::new()
        .field("sakai:activity-appid", "content")
        .field("sakai:activity-templateid", "default")
        .field("sakai:activityMessage", "UPDATED_COPYRIGHT")
}

async fn post_activity(ctx: &mut ScenarioContext, user: &str) -> Result<Exchange> {
    let actor = ctx.test_user(user)?;
    let pool_id = ctx.private_document()?.clone();

    let session = ctx.session.as_user(actor);
    let url = session.url_for(&format!("{}.activity.json", pool_id.content_path()))?;
    session.execute_post(url, &activity_form()).await
}

/// `Verify that "<user>" can post an activity on the private document`
///
/// # Errors
///
/// Fails unless the server answers 200.
pub async fn verify_can_post_activity(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    post_activity(ctx, user)
        .await?
        .expect_status(200, "user could not create activity")?;
    Ok(())
}

/// `Verify that "<user>" cannot post an activity on the private document`
///
/// # Errors
///
/// Fails if the server answers 200.
pub async fn verify_cannot_post_activity(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    post_activity(ctx, user)
        .await?
        .expect_not_status(200, "user was able to create activity")?;
    Ok(())
}
