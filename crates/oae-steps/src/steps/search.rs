//! Tag search visibility.

use crate::ScenarioContext;
use crate::search::{self, GENERAL_SEARCH_PATH, SearchResults};
use oae_core::{Error, Result};

/// Outcome of one tag search.
struct Lookup {
    found: bool,
    title: String,
    body: String,
}

/// Searches on the tag as `user` and reports whether the remembered
/// document title is among the hits.
async fn finds_tagged_document(ctx: &mut ScenarioContext, user: &str, tag: &str) -> Result<Lookup> {
    let searcher = ctx.test_user(user)?;
    let tag = ctx.tag_name(tag)?;
    let title = ctx.document_title()?.to_string();

    let session = ctx.session.as_user(searcher);
    let url = session.url_for_query(GENERAL_SEARCH_PATH, &search::tag_query(&tag))?;
    let exchange = session.execute_get(url).await?;
    exchange.expect_status(200, "search failed")?;

    let results: SearchResults = exchange.json()?;
    let found = results.contains_file(&title);
    tracing::debug!(
        tag = %tag,
        hits = results.results.len(),
        found,
        "Searched on tag"
    );
    Ok(Lookup {
        found,
        title,
        body: exchange.body().to_string(),
    })
}

/// `Verify "<user>" retrieves "<doc>" when searching on the tag "<tag>"`
///
/// The document checked for is the one the last tagged-document step
/// created; the `doc` phrase argument is descriptive only.
///
/// # Errors
///
/// Fails if the search fails or the document is not among the hits.
pub async fn verify_retrieves(ctx: &mut ScenarioContext, user: &str, tag: &str) -> Result<()> {
    let lookup = finds_tagged_document(ctx, user, tag).await?;
    if lookup.found {
        return Ok(());
    }

    let message = format!("document \"{}\" not searchable by user \"{user}\"", lookup.title);
    tracing::error!(body = %lookup.body, "{message}");
    Err(Error::AssertionFailed { message })
}

/// `Verify "<user>" does not retrieve "<doc>" when searching on the tag "<tag>"`
///
/// # Errors
///
/// Fails if the search fails or the document is among the hits.
pub async fn verify_does_not_retrieve(
    ctx: &mut ScenarioContext,
    user: &str,
    tag: &str,
) -> Result<()> {
    let lookup = finds_tagged_document(ctx, user, tag).await?;
    if !lookup.found {
        return Ok(());
    }

    let message = format!(
        "document \"{}\" should not be searchable by user \"{user}\"",
        lookup.title
    );
    tracing::error!(body = %lookup.body, "{message}");
    Err(Error::AssertionFailed { message })
}
