//! Private sakai documents and tagged pooled files.

use crate::ScenarioContext;
use crate::payloads::{self, DocumentIds};
use oae_client::{Exchange, FileManager, Session};
use oae_core::{PoolId, Result};

const TAGGED_FILE_BODY: &str = "bogus data";
const TAGGED_FILE_MIME: &str = "text/plain";

/// Removes public access from an item and saves its private metadata.
async fn privatise(session: &Session, pool_id: &PoolId, page_id: &str, title: &str) -> Result<()> {
    let url = session.url_for("/system/batch")?;
    session
        .execute_post(url, &payloads::privatise_form(pool_id))
        .await?
        .expect_success(format!("Unable to make {title} private"))?;

    let url = session.url_for(&format!("{}/{page_id}.save.json", pool_id.content_path()))?;
    session
        .execute_post(url, &payloads::private_metadata(title))
        .await?
        .expect_success(format!("Unable to save metadata of {title}"))?;
    Ok(())
}

/// `"<user>" creates a private document`
///
/// Creates a one-page sakai document as the user, lays out its page, and
/// makes it private. The pool id is remembered for later steps.
///
/// # Errors
///
/// Fails if any request is not accepted.
pub async fn create_private_document(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let owner = ctx.test_user(user)?;
    let ids = DocumentIds::random();
    let failure = format!("Unable to create file {}", ids.title);

    let session = ctx.session.as_user(owner);

    let exchange = FileManager::new(&session)
        .create_pooled_item(&payloads::document_form(&ids))
        .await?;
    exchange.expect_status(201, failure.as_str())?;
    let pool_id = FileManager::created_pool_id(&exchange)?;

    let url = session.url_for(&pool_id.content_path())?;
    session
        .execute_post(url, &payloads::import_form(&ids.id))
        .await?
        .expect_status(201, failure.as_str())?;

    let url = session.url_for(&format!("{}/{}.save.json", pool_id.content_path(), ids.id))?;
    session
        .execute_post(url, &payloads::page_content_form())
        .await?
        .expect_success(format!("Unable to save page content of {}", ids.title))?;

    privatise(&session, &pool_id, &ids.id, &ids.title).await?;
    drop(session);

    tracing::info!(pool_id = %pool_id, title = %ids.title, "Created private document");
    ctx.private_document = Some(pool_id);
    Ok(())
}

async fn view_private_document(ctx: &mut ScenarioContext, user: &str) -> Result<(PoolId, Exchange)> {
    let viewer = ctx.test_user(user)?;
    let pool_id = ctx.private_document()?.clone();

    let session = ctx.session.as_user(viewer);
    let url = session.url_for(&pool_id.content_path())?;
    let exchange = session.execute_get(url).await?;
    Ok((pool_id, exchange))
}

/// `Verify that "<user>" can view the private document`
///
/// # Errors
///
/// Fails unless the server answers 200.
pub async fn verify_can_view(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let (pool_id, exchange) = view_private_document(ctx, user).await?;
    exchange.expect_status(200, format!("Unable to view document with ID {pool_id}"))?;
    Ok(())
}

/// `Verify that "<user>" cannot view the private document`
///
/// The server hides private items it will not show, so the expected
/// answer is 404 rather than 403.
///
/// # Errors
///
/// Fails unless the server answers 404.
pub async fn verify_cannot_view(ctx: &mut ScenarioContext, user: &str) -> Result<()> {
    let (pool_id, exchange) = view_private_document(ctx, user).await?;
    exchange.expect_status(404, format!("Able to view document with ID {pool_id}"))?;
    Ok(())
}

/// `"<user>" creates a private document named "<title>" with tag "<tag>"`
///
/// Uploads a small text file under the qualified title, tags it, and makes
/// it private. The title is remembered for the search steps, and the step
/// then waits for the search index.
///
/// # Errors
///
/// Fails if any request is not accepted.
pub async fn create_tagged_document(
    ctx: &mut ScenarioContext,
    user: &str,
    title: &str,
    tag: &str,
) -> Result<()> {
    let owner = ctx.test_user(user)?;
    let title = ctx.marker.qualify(title);
    let tag = ctx.tag_name(tag)?;
    let page_id = DocumentIds::random().id;
    let index_wait = ctx.session.config().index_wait();

    let session = ctx.session.as_user(owner);

    let exchange = FileManager::new(&session)
        .upload_pooled_file(&title, TAGGED_FILE_BODY, TAGGED_FILE_MIME)
        .await?;
    exchange.expect_success(format!("Unable to upload {title}"))?;
    let pool_id = FileManager::uploaded_pool_id(&exchange, &title)?;

    let url = session.url_for(&pool_id.content_path())?;
    session
        .execute_post(url, &payloads::tag_form(tag.as_str()))
        .await?
        .expect_success(format!("Unable to tag {title} with {tag}"))?;

    privatise(&session, &pool_id, &page_id, &title).await?;
    drop(session);

    tracing::info!(pool_id = %pool_id, title = %title, tag = %tag, "Created tagged document");
    ctx.document_title = Some(title);
    tracing::debug!(wait = ?index_wait, "Waiting for search index");
    tokio::time::sleep(index_wait).await;
    Ok(())
}
