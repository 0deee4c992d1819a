//! Step logic against a mock server.

use mockito::{Matcher, Mock, Server, ServerGuard};
use oae_core::{Error, RunMarker, TargetConfig};
use oae_steps::ScenarioContext;
use oae_steps::steps::{activity, administration, documents, groups, registration, search};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ADMIN_AUTH: &str = "Basic YWRtaW46YWRtaW4=";
const BOB_AUTH: &str = "Basic Ym9iLTQyOnRlc3R1c2Vy";
const ALICE_AUTH: &str = "Basic YWxpY2UtNDI6dGVzdHVzZXI=";

async fn setup() -> (ServerGuard, ScenarioContext) {
    let server = Server::new_async().await;
    let config = TargetConfig::builder()
        .server_url(server.url())
        .index_wait(Duration::ZERO)
        .build()
        .unwrap();
    let ctx = ScenarioContext::new(&config, RunMarker::new("42").unwrap()).unwrap();
    (server, ctx)
}

async fn post(server: &mut ServerGuard, path: &str, auth: &str, status: usize) -> Mock {
    server
        .mock("POST", path)
        .match_header("authorization", auth)
        .with_status(status)
        .create_async()
        .await
}

/// Mocks every request of the private document flow for `abc`, owned by bob.
async fn mock_private_document(server: &mut ServerGuard) -> Vec<Mock> {
    let create = server
        .mock("POST", "/system/pool/createfile")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("mimeType".into(), "x-sakai/document".into()),
            Matcher::UrlEncoded("sakai:schemaversion".into(), "2".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"_contentItem":{"poolId":"abc","item":{}}}"#)
        .expect(1)
        .create_async()
        .await;
    let import = server
        .mock("POST", "/p/abc")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::UrlEncoded(":operation".into(), "import".into()))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let save = server
        .mock("POST", Matcher::Regex(r"^/p/abc/id\d+\.save\.json$".into()))
        .match_header("authorization", BOB_AUTH)
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let batch = server
        .mock("POST", "/system/batch")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::Regex("modifyAce".into()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    vec![create, import, save, batch]
}

/// Tests the whole private document flow and that the pool id is kept.
#[tokio::test]
async fn test_create_private_document() {
    let (mut server, mut ctx) = setup().await;
    let mocks = mock_private_document(&mut server).await;

    documents::create_private_document(&mut ctx, "bob")
        .await
        .unwrap();

    assert_eq!(ctx.private_document().unwrap().as_str(), "abc");
    assert_eq!(ctx.session().get_user().name().as_str(), "admin");
    for mock in mocks {
        mock.assert_async().await;
    }
}

/// Tests that a refused creation fails the step before any follow-up request.
#[tokio::test]
async fn test_create_private_document_refused() {
    let (mut server, mut ctx) = setup().await;
    let _create = post(&mut server, "/system/pool/createfile", BOB_AUTH, 500).await;
    let import = server.mock("POST", "/p/abc").expect(0).create_async().await;

    let err = documents::create_private_document(&mut ctx, "bob")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedStatus { actual: 500, .. }
    ));
    assert!(err.to_string().contains("Unable to create file document_"));
    assert!(ctx.private_document().is_err());
    import.assert_async().await;
}

/// Tests the view checks for the owner and an outsider.
#[tokio::test]
async fn test_view_private_document() {
    let (mut server, mut ctx) = setup().await;
    let _flow = mock_private_document(&mut server).await;
    documents::create_private_document(&mut ctx, "bob")
        .await
        .unwrap();

    let _owner = server
        .mock("GET", "/p/abc")
        .match_header("authorization", BOB_AUTH)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _outsider = server
        .mock("GET", "/p/abc")
        .match_header("authorization", ALICE_AUTH)
        .with_status(404)
        .create_async()
        .await;

    documents::verify_can_view(&mut ctx, "bob").await.unwrap();
    documents::verify_cannot_view(&mut ctx, "alice")
        .await
        .unwrap();

    let err = documents::verify_cannot_view(&mut ctx, "bob")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Able to view document with ID abc"));
}

/// Tests that view steps fail without contacting the server when no
/// document was created.
#[tokio::test]
async fn test_view_without_document() {
    let (mut server, mut ctx) = setup().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = documents::verify_can_view(&mut ctx, "bob")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingContext { .. }));
    any.assert_async().await;
}

/// Tests activity posting on the private document.
#[tokio::test]
async fn test_post_activity() {
    let (mut server, mut ctx) = setup().await;
    let _flow = mock_private_document(&mut server).await;
    documents::create_private_document(&mut ctx, "bob")
        .await
        .unwrap();

    let allowed = server
        .mock("POST", "/p/abc.activity.json")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sakai:activity-appid".into(), "content".into()),
            Matcher::UrlEncoded("sakai:activityMessage".into(), "UPDATED_COPYRIGHT".into()),
        ]))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let _denied = post(&mut server, "/p/abc.activity.json", ALICE_AUTH, 500).await;

    activity::verify_can_post_activity(&mut ctx, "bob")
        .await
        .unwrap();
    activity::verify_cannot_post_activity(&mut ctx, "alice")
        .await
        .unwrap();
    let err = activity::verify_cannot_post_activity(&mut ctx, "bob")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("user was able to create activity"));
    allowed.assert_async().await;
}

async fn mock_tagged_document(server: &mut ServerGuard) -> Vec<Mock> {
    let upload = server
        .mock("POST", "/system/pool/createfile")
        .match_header("authorization", BOB_AUTH)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".into()),
        )
        .with_status(201)
        .with_body(r#"{"notes-42":{"poolId":"t1","item":{}}}"#)
        .expect(1)
        .create_async()
        .await;
    let tag = server
        .mock("POST", "/p/t1")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(":operation".into(), "tag".into()),
            Matcher::UrlEncoded("key".into(), "/tags/physics-42".into()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let batch = post(server, "/system/batch", BOB_AUTH, 200).await;
    let metadata = server
        .mock("POST", Matcher::Regex(r"^/p/t1/id\d+\.save\.json$".into()))
        .match_body(Matcher::UrlEncoded(
            "sakai:pooled-content-file-name".into(),
            "notes-42".into(),
        ))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    vec![upload, tag, batch, metadata]
}

async fn mock_search(server: &mut ServerGuard, auth: &str, body: &str) -> Mock {
    server
        .mock("GET", Matcher::Regex(r"^/var/search/general\.json".into()))
        .match_header("authorization", auth)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "physics-42".into()),
            Matcher::UrlEncoded("sortOn".into(), "score".into()),
            Matcher::UrlEncoded("items".into(), "18".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

/// Tests tagging a document and finding it by tag.
#[tokio::test]
async fn test_tagged_document_search() {
    let (mut server, mut ctx) = setup().await;
    let mocks = mock_tagged_document(&mut server).await;

    documents::create_tagged_document(&mut ctx, "bob", "notes", "physics")
        .await
        .unwrap();
    assert_eq!(ctx.document_title().unwrap(), "notes-42");
    for mock in mocks {
        mock.assert_async().await;
    }

    let _found = mock_search(
        &mut server,
        BOB_AUTH,
        r#"{"results":[{"sakai:pooled-content-file-name":"other"},{"sakai:pooled-content-file-name":"notes-42"}],"total":2}"#,
    )
    .await;
    let _hidden = mock_search(&mut server, ALICE_AUTH, r#"{"results":[],"total":0}"#).await;

    search::verify_retrieves(&mut ctx, "bob", "physics")
        .await
        .unwrap();
    search::verify_does_not_retrieve(&mut ctx, "alice", "physics")
        .await
        .unwrap();

    let err = search::verify_retrieves(&mut ctx, "alice", "physics")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Assertion failed: document \"notes-42\" not searchable by user \"alice\""
    );
    let err = search::verify_does_not_retrieve(&mut ctx, "bob", "physics")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("should not be searchable"));
}

/// Log output shared with a test.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Tests that a failed search check logs the response body.
#[tokio::test]
async fn test_search_failure_logs_body() {
    let (mut server, mut ctx) = setup().await;
    let _flow = mock_tagged_document(&mut server).await;
    documents::create_tagged_document(&mut ctx, "bob", "notes", "physics")
        .await
        .unwrap();
    let _search = mock_search(
        &mut server,
        BOB_AUTH,
        r#"{"results":[{"sakai:pooled-content-file-name":"unrelated-7"}]}"#,
    )
    .await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    search::verify_retrieves(&mut ctx, "bob", "physics")
        .await
        .unwrap_err();

    let output = logs.contents();
    assert!(output.contains("not searchable by user"));
    assert!(output.contains("unrelated-7"));
}

/// Tests that a failed upload leaves no document for the search steps.
#[tokio::test]
async fn test_failed_tagged_document_keeps_no_title() {
    let (mut server, mut ctx) = setup().await;
    let _upload = post(&mut server, "/system/pool/createfile", BOB_AUTH, 500).await;

    let err = documents::create_tagged_document(&mut ctx, "bob", "notes", "physics")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus { .. }));
    assert!(matches!(ctx.document_title(), Err(Error::MissingContext { .. })));
}

/// Tests that a search body without `results` is rejected.
#[tokio::test]
async fn test_search_without_results_field() {
    let (mut server, mut ctx) = setup().await;
    let _flow = mock_tagged_document(&mut server).await;
    documents::create_tagged_document(&mut ctx, "bob", "notes", "physics")
        .await
        .unwrap();
    let _search = mock_search(&mut server, BOB_AUTH, r#"{"total":0}"#).await;

    let err = search::verify_does_not_retrieve(&mut ctx, "bob", "physics")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }));
}

/// Tests administrator membership and upgrade authorization.
#[tokio::test]
async fn test_administration() {
    let (mut server, mut ctx) = setup().await;
    let membership = server
        .mock(
            "POST",
            "/system/userManager/group/administrators.update.html",
        )
        .match_header("authorization", ADMIN_AUTH)
        .match_body(Matcher::UrlEncoded(":member".into(), "bob-42".into()))
        .with_status(200)
        .create_async()
        .await;
    let _bob_upgrade = post(&mut server, "/system/sparseupgrade", BOB_AUTH, 200).await;
    let _alice_upgrade = post(&mut server, "/system/sparseupgrade", ALICE_AUTH, 403).await;
    let new_user = server
        .mock("POST", "/system/userManager/user")
        .match_header("authorization", BOB_AUTH)
        .match_body(Matcher::UrlEncoded(":name".into(), "newuser-42".into()))
        .with_status(200)
        .create_async()
        .await;

    administration::add_to_administrators(&mut ctx, "bob")
        .await
        .unwrap();
    administration::verify_can_create_user(&mut ctx, "bob")
        .await
        .unwrap();
    administration::verify_can_initiate_upgrade(&mut ctx, "bob")
        .await
        .unwrap();
    administration::verify_cannot_initiate_upgrade(&mut ctx, "alice")
        .await
        .unwrap();

    membership.assert_async().await;
    new_user.assert_async().await;
}

/// Tests that a failed check still restores the acting user.
#[tokio::test]
async fn test_failed_check_restores_user() {
    let (mut server, mut ctx) = setup().await;
    let _upgrade = post(&mut server, "/system/sparseupgrade", ALICE_AUTH, 403).await;

    let err = administration::verify_can_initiate_upgrade(&mut ctx, "alice")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedStatus { actual: 403, .. }
    ));
    assert_eq!(ctx.session().get_user().name().as_str(), "admin");
}

/// Tests group creation and member management.
#[tokio::test]
async fn test_groups() {
    let (mut server, mut ctx) = setup().await;
    let create = server
        .mock("POST", "/system/userManager/group.create.html")
        .match_header("authorization", ADMIN_AUTH)
        .match_body(Matcher::UrlEncoded(":name".into(), "math-42".into()))
        .with_status(200)
        .create_async()
        .await;
    let _add_as_admin = post(
        &mut server,
        "/system/userManager/group/math-42.update.html",
        ADMIN_AUTH,
        200,
    )
    .await;
    let _add_as_bob = post(
        &mut server,
        "/system/userManager/group/math-42.update.html",
        BOB_AUTH,
        200,
    )
    .await;
    let _add_as_alice = post(
        &mut server,
        "/system/userManager/group/math-42.update.html",
        ALICE_AUTH,
        403,
    )
    .await;

    groups::ensure_group(&mut ctx, "math").await.unwrap();
    groups::add_member(&mut ctx, "alice", "math").await.unwrap();
    groups::verify_can_add_member(&mut ctx, "bob", "carol", "math")
        .await
        .unwrap();
    groups::verify_cannot_add_member(&mut ctx, "alice", "carol", "math")
        .await
        .unwrap();

    let err = groups::verify_can_add_member(&mut ctx, "alice", "carol", "math")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("alice could not add carol to math"));
    create.assert_async().await;
}

/// Tests that a refused group creation fails the step.
#[tokio::test]
async fn test_group_refused() {
    let (mut server, mut ctx) = setup().await;
    let _create = post(
        &mut server,
        "/system/userManager/group.create.html",
        ADMIN_AUTH,
        500,
    )
    .await;

    let err = groups::ensure_group(&mut ctx, "math").await.unwrap_err();
    assert!(matches!(err, Error::AssertionFailed { .. }));
}

/// Tests the group property steps switch to the administrator for good.
#[tokio::test]
async fn test_group_properties_as_admin() {
    let (mut server, mut ctx) = setup().await;
    let managers = server
        .mock("POST", "/system/userManager/group/math-42.update.html")
        .match_header("authorization", ADMIN_AUTH)
        .match_body(Matcher::UrlEncoded(
            "sakai:managers-group".into(),
            "math-managers-42".into(),
        ))
        .with_status(200)
        .create_async()
        .await;
    let collection = server
        .mock("POST", "/system/userManager/group/reading-42.update.html")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sakai:pseudoGroup".into(), "true".into()),
            Matcher::UrlEncoded("sakai:category".into(), "collection".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let bob = ctx.test_user("bob").unwrap();
    ctx.session_mut().switch_user(bob);

    groups::set_managers_group(&mut ctx, "math-managers", "math")
        .await
        .unwrap();
    assert_eq!(ctx.session().get_user().name().as_str(), "admin");
    groups::make_collection(&mut ctx, "reading").await.unwrap();

    managers.assert_async().await;
    collection.assert_async().await;
}

/// Tests that an anonymous registration refusal is recorded.
#[tokio::test]
async fn test_registration_refused() {
    let (mut server, mut ctx) = setup().await;
    let config = server
        .mock(
            "POST",
            "/system/console/configMgr/org.sakaiproject.nakamura.user.lite.servlet.LiteCreateSakaiUserServlet",
        )
        .match_header("authorization", ADMIN_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("self.registration.enabled".into(), "false".into()),
            Matcher::UrlEncoded("propertylist".into(), "self.registration.enabled".into()),
        ]))
        .with_status(302)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/system/userManager/user.create.html")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::UrlEncoded(":name".into(), "foo-42".into()))
        .with_status(500)
        .create_async()
        .await;

    registration::set_self_registration(&mut ctx, false)
        .await
        .unwrap();
    registration::try_create_user(&mut ctx).await.unwrap();

    assert!(ctx.session().get_user().is_anonymous());
    registration::verify_registration(&ctx, false).unwrap();
    assert!(registration::verify_registration(&ctx, true).is_err());
    config.assert_async().await;
    create.assert_async().await;
}

/// Tests that an accepted registration is recorded.
#[tokio::test]
async fn test_registration_created() {
    let (mut server, mut ctx) = setup().await;
    let _create = server
        .mock("POST", "/system/userManager/user.create.html")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    registration::try_create_user(&mut ctx).await.unwrap();

    registration::verify_registration(&ctx, true).unwrap();
    let err = registration::verify_registration(&ctx, false).unwrap_err();
    assert!(err.to_string().contains("foo-42"));
}

/// Tests that the invalid creation attempts store their response.
#[tokio::test]
async fn test_invalid_creation_attempts() {
    let (mut server, mut ctx) = setup().await;
    let no_name = server
        .mock("POST", "/system/userManager/user.create.html")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pwd".into(), "shhh".into()),
            Matcher::Regex("^[^%]*$".into()),
        ]))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let mismatched = server
        .mock("POST", "/system/userManager/user.create.html")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(":name".into(), "lucy-42".into()),
            Matcher::UrlEncoded("pwd".into(), "secret".into()),
        ]))
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    assert!(registration::verify_response_status(&ctx, 500).is_err());

    registration::try_create_user_without_name(&mut ctx)
        .await
        .unwrap();
    registration::verify_response_status(&ctx, 500).unwrap();

    registration::try_create_user_with_mismatched_password(&mut ctx)
        .await
        .unwrap();
    registration::verify_response_status(&ctx, 400).unwrap();
    let err = registration::verify_response_status(&ctx, 500).unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedStatus { actual: 400, .. }
    ));

    no_name.assert_async().await;
    mismatched.assert_async().await;
}

/// Tests that existing users are created by the administrator.
#[tokio::test]
async fn test_ensure_user() {
    let (mut server, mut ctx) = setup().await;
    let create = server
        .mock("POST", "/system/userManager/user.create.html")
        .match_header("authorization", ADMIN_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(":name".into(), "bob-42".into()),
            Matcher::UrlEncoded("pwd".into(), "testuser".into()),
            Matcher::UrlEncoded("email".into(), "bob-42@sakai.invalid".into()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    registration::ensure_user(&mut ctx, "bob").await.unwrap();
    create.assert_async().await;
}
