//! Phrase table and the cucumber bindings for every step.
//!
//! [`STEPS`] describes each phrase for listing; the functions below bind
//! the same patterns to cucumber. A step fails by panicking with the
//! error's message, which cucumber reports as a failed step.

#![allow(clippy::needless_pass_by_value)]

use crate::OaeWorld;
use crate::steps::{activity, administration, documents, groups, registration, search};
use cucumber::{given, then, when};
use oae_core::Result;
use serde::Serialize;
use std::fmt;

/// Gherkin keyword a phrase is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    /// Setup
    Given,
    /// Action
    When,
    /// Assertion
    Then,
}

impl Keyword {
    /// Returns the keyword as written in feature files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phrase of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    /// Keyword the phrase is normally written with
    pub keyword: Keyword,
    /// Concern the step belongs to
    pub concern: &'static str,
    /// Anchored regular expression the phrase must match
    pub pattern: &'static str,
    /// What the step does
    pub summary: &'static str,
    /// A phrase the pattern matches
    pub example: &'static str,
}

impl StepDefinition {
    /// Returns `true` if `filter` occurs in the pattern, summary, example or
    /// concern, ignoring case.
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        [self.concern, self.pattern, self.summary, self.example]
            .iter()
            .any(|field| field.to_lowercase().contains(&filter))
    }
}

macro_rules! step {
    ($keyword:ident, $concern:literal, $pattern:literal, $summary:literal, $example:literal) => {
        StepDefinition {
            keyword: Keyword::$keyword,
            concern: $concern,
            pattern: $pattern,
            summary: $summary,
            example: $example,
        }
    };
}

/// Every phrase the suite understands.
pub const STEPS: &[StepDefinition] = &[
    step!(
        Given,
        "administration",
        r#"^"([^"]*)" is a member of the administrators group$"#,
        "Adds the user to the administrators group as the administrator",
        r#""bob" is a member of the administrators group"#
    ),
    step!(
        Then,
        "administration",
        r#"^Verify "([^"]*)" can create a user$"#,
        "Creates a user as the named user and expects 200",
        r#"Verify "bob" can create a user"#
    ),
    step!(
        Then,
        "administration",
        r#"^Verify "([^"]*)" can initiate the upgrade process$"#,
        "Starts a dry-run upgrade as the named user and expects 200",
        r#"Verify "bob" can initiate the upgrade process"#
    ),
    step!(
        Then,
        "administration",
        r#"^Verify "([^"]*)" cannot initiate the upgrade process$"#,
        "Starts a dry-run upgrade as the named user and expects 403",
        r#"Verify "alice" cannot initiate the upgrade process"#
    ),
    step!(
        When,
        "documents",
        r#"^"([^"]*)" creates a private document$"#,
        "Creates a one-page private sakai document owned by the user",
        r#""bob" creates a private document"#
    ),
    step!(
        Then,
        "documents",
        r#"^Verify that "([^"]*)" can view the private document$"#,
        "Fetches the private document as the user and expects 200",
        r#"Verify that "bob" can view the private document"#
    ),
    step!(
        Then,
        "documents",
        r#"^Verify that "([^"]*)" cannot view the private document$"#,
        "Fetches the private document as the user and expects 404",
        r#"Verify that "alice" cannot view the private document"#
    ),
    step!(
        Given,
        "documents",
        r#"^"([^"]*)" creates a private document named "([^"]*)" with tag "([^"]*)"$"#,
        "Uploads, tags and privatises a file, then waits for the search index",
        r#""bob" creates a private document named "notes" with tag "physics""#
    ),
    step!(
        Then,
        "search",
        r#"^Verify "([^"]*)" retrieves "([^"]*)" when searching on the tag "([^"]*)"$"#,
        "Searches on the tag as the user and expects the tagged document",
        r#"Verify "bob" retrieves "notes" when searching on the tag "physics""#
    ),
    step!(
        Then,
        "search",
        r#"^Verify "([^"]*)" does not retrieve "([^"]*)" when searching on the tag "([^"]*)"$"#,
        "Searches on the tag as the user and expects no tagged document",
        r#"Verify "alice" does not retrieve "notes" when searching on the tag "physics""#
    ),
    step!(
        Then,
        "activity",
        r#"^Verify that "([^"]*)" can post an activity on the private document$"#,
        "Posts an activity on the private document and expects 200",
        r#"Verify that "bob" can post an activity on the private document"#
    ),
    step!(
        Then,
        "activity",
        r#"^Verify that "([^"]*)" cannot post an activity on the private document$"#,
        "Posts an activity on the private document and expects anything but 200",
        r#"Verify that "alice" cannot post an activity on the private document"#
    ),
    step!(
        Given,
        "groups",
        r#"^A group named "([^"]*)" exists$"#,
        "Creates the group as the current user",
        r#"A group named "math" exists"#
    ),
    step!(
        When,
        "groups",
        r#"^I add member "([^"]*)" to Group "([^"]*)"$"#,
        "Adds the user to the group as the current user",
        r#"I add member "bob" to Group "math""#
    ),
    step!(
        Then,
        "groups",
        r#"^Verify "([^"]*)" can add member "([^"]*)" to Group "([^"]*)"$"#,
        "Adds a member as the first user and expects 200",
        r#"Verify "bob" can add member "alice" to Group "math""#
    ),
    step!(
        Then,
        "groups",
        r#"^Verify "([^"]*)" cannot add member "([^"]*)" to Group "([^"]*)"$"#,
        "Adds a member as the first user and expects 403",
        r#"Verify "alice" cannot add member "carol" to Group "math""#
    ),
    step!(
        Given,
        "groups",
        r#"^the Group "([^"]*)" is a Collection$"#,
        "Marks the group as a collection pseudo-group as the administrator",
        r#"the Group "reading" is a Collection"#
    ),
    step!(
        Given,
        "groups",
        r#"^the Group "([^"]*)" is the managers group of the Group "([^"]*)"$"#,
        "Makes the first group manage the second as the administrator",
        r#"the Group "math-managers" is the managers group of the Group "math""#
    ),
    step!(
        Given,
        "registration",
        r"^User self-registration is (enabled|disabled)$",
        "Enables or disables self-registration as the administrator",
        "User self-registration is disabled"
    ),
    step!(
        When,
        "registration",
        r"^I try to create a new user$",
        "Tries to register a user anonymously and records the outcome",
        "I try to create a new user"
    ),
    step!(
        When,
        "registration",
        r"^I try to create a new user with captcha$",
        "Tries to register anonymously through reCAPTCHA and records the response",
        "I try to create a new user with captcha"
    ),
    step!(
        When,
        "registration",
        r"^I try to create a new user with no name$",
        "Tries to create a user without a name and records the response",
        "I try to create a new user with no name"
    ),
    step!(
        When,
        "registration",
        r"^I try to create a new user without password$",
        "Tries to create a user without a password and records the response",
        "I try to create a new user without password"
    ),
    step!(
        When,
        "registration",
        r"^I try to create a new user without matching password confirmation$",
        "Tries to create a user with a mismatched confirmation and records the response",
        "I try to create a new user without matching password confirmation"
    ),
    step!(
        Given,
        "registration",
        r#"^a user named "([^"]*)" exists$"#,
        "Creates the user as the administrator",
        r#"a user named "bob" exists"#
    ),
    step!(
        Then,
        "registration",
        r"^the response status code is (\d{3})$",
        "Checks the status of the last recorded response",
        "the response status code is 400"
    ),
    step!(
        Then,
        "registration",
        r"^the new user is (created|not created)$",
        "Checks the outcome of the last registration attempt",
        "the new user is not created"
    ),
];

/// Returns the phrases matching `filter`, or all of them.
pub fn filtered(filter: Option<&str>) -> impl Iterator<Item = &'static StepDefinition> {
    let filter = filter.map(str::to_string);
    STEPS
        .iter()
        .filter(move |step| filter.as_deref().is_none_or(|f| step.matches_filter(f)))
}

trait OrFail<T> {
    fn or_fail(self) -> T;
}

impl<T> OrFail<T> for Result<T> {
    #[track_caller]
    fn or_fail(self) -> T {
        self.unwrap_or_else(|e| panic!("{e}"))
    }
}

// administration

#[given(regex = r#"^"([^"]*)" is a member of the administrators group$"#)]
async fn is_administrator(world: &mut OaeWorld, user: String) {
    administration::add_to_administrators(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify "([^"]*)" can create a user$"#)]
async fn can_create_user(world: &mut OaeWorld, user: String) {
    administration::verify_can_create_user(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify "([^"]*)" can initiate the upgrade process$"#)]
async fn can_upgrade(world: &mut OaeWorld, user: String) {
    administration::verify_can_initiate_upgrade(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify "([^"]*)" cannot initiate the upgrade process$"#)]
async fn cannot_upgrade(world: &mut OaeWorld, user: String) {
    administration::verify_cannot_initiate_upgrade(world.context().or_fail(), &user)
        .await
        .or_fail();
}

// documents

#[given(regex = r#"^"([^"]*)" creates a private document$"#)]
#[when(regex = r#"^"([^"]*)" creates a private document$"#)]
async fn creates_private_document(world: &mut OaeWorld, user: String) {
    documents::create_private_document(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify that "([^"]*)" can view the private document$"#)]
async fn can_view(world: &mut OaeWorld, user: String) {
    documents::verify_can_view(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify that "([^"]*)" cannot view the private document$"#)]
async fn cannot_view(world: &mut OaeWorld, user: String) {
    documents::verify_cannot_view(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[given(regex = r#"^"([^"]*)" creates a private document named "([^"]*)" with tag "([^"]*)"$"#)]
#[when(regex = r#"^"([^"]*)" creates a private document named "([^"]*)" with tag "([^"]*)"$"#)]
async fn creates_tagged_document(world: &mut OaeWorld, user: String, title: String, tag: String) {
    documents::create_tagged_document(world.context().or_fail(), &user, &title, &tag)
        .await
        .or_fail();
}

// search

#[then(regex = r#"^Verify "([^"]*)" retrieves "([^"]*)" when searching on the tag "([^"]*)"$"#)]
async fn retrieves(world: &mut OaeWorld, user: String, _doc: String, tag: String) {
    search::verify_retrieves(world.context().or_fail(), &user, &tag)
        .await
        .or_fail();
}

#[then(
    regex = r#"^Verify "([^"]*)" does not retrieve "([^"]*)" when searching on the tag "([^"]*)"$"#
)]
async fn does_not_retrieve(world: &mut OaeWorld, user: String, _doc: String, tag: String) {
    search::verify_does_not_retrieve(world.context().or_fail(), &user, &tag)
        .await
        .or_fail();
}

// activity

#[then(regex = r#"^Verify that "([^"]*)" can post an activity on the private document$"#)]
async fn can_post_activity(world: &mut OaeWorld, user: String) {
    activity::verify_can_post_activity(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify that "([^"]*)" cannot post an activity on the private document$"#)]
async fn cannot_post_activity(world: &mut OaeWorld, user: String) {
    activity::verify_cannot_post_activity(world.context().or_fail(), &user)
        .await
        .or_fail();
}

// groups

#[given(regex = r#"^A group named "([^"]*)" exists$"#)]
async fn group_exists(world: &mut OaeWorld, group: String) {
    groups::ensure_group(world.context().or_fail(), &group)
        .await
        .or_fail();
}

#[when(regex = r#"^I add member "([^"]*)" to Group "([^"]*)"$"#)]
async fn add_member(world: &mut OaeWorld, user: String, group: String) {
    groups::add_member(world.context().or_fail(), &user, &group)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify "([^"]*)" can add member "([^"]*)" to Group "([^"]*)"$"#)]
async fn can_add_member(world: &mut OaeWorld, actor: String, user: String, group: String) {
    groups::verify_can_add_member(world.context().or_fail(), &actor, &user, &group)
        .await
        .or_fail();
}

#[then(regex = r#"^Verify "([^"]*)" cannot add member "([^"]*)" to Group "([^"]*)"$"#)]
async fn cannot_add_member(world: &mut OaeWorld, actor: String, user: String, group: String) {
    groups::verify_cannot_add_member(world.context().or_fail(), &actor, &user, &group)
        .await
        .or_fail();
}

#[given(regex = r#"^the Group "([^"]*)" is a Collection$"#)]
async fn is_collection(world: &mut OaeWorld, group: String) {
    groups::make_collection(world.context().or_fail(), &group)
        .await
        .or_fail();
}

#[given(regex = r#"^the Group "([^"]*)" is the managers group of the Group "([^"]*)"$"#)]
async fn is_managers_group(world: &mut OaeWorld, managers: String, group: String) {
    groups::set_managers_group(world.context().or_fail(), &managers, &group)
        .await
        .or_fail();
}

// registration

#[given(regex = r"^User self-registration is (enabled|disabled)$")]
async fn self_registration(world: &mut OaeWorld, state: String) {
    registration::set_self_registration(world.context().or_fail(), state == "enabled")
        .await
        .or_fail();
}

#[when(regex = r"^I try to create a new user$")]
async fn try_create_user(world: &mut OaeWorld) {
    registration::try_create_user(world.context().or_fail())
        .await
        .or_fail();
}

#[when(regex = r"^I try to create a new user with captcha$")]
async fn try_create_user_with_captcha(world: &mut OaeWorld) {
    registration::try_create_user_with_captcha(world.context().or_fail())
        .await
        .or_fail();
}

#[when(regex = r"^I try to create a new user with no name$")]
async fn try_create_user_without_name(world: &mut OaeWorld) {
    registration::try_create_user_without_name(world.context().or_fail())
        .await
        .or_fail();
}

#[when(regex = r"^I try to create a new user without password$")]
async fn try_create_user_without_password(world: &mut OaeWorld) {
    registration::try_create_user_without_password(world.context().or_fail())
        .await
        .or_fail();
}

#[when(regex = r"^I try to create a new user without matching password confirmation$")]
async fn try_create_user_with_mismatched_password(world: &mut OaeWorld) {
    registration::try_create_user_with_mismatched_password(world.context().or_fail())
        .await
        .or_fail();
}

#[given(regex = r#"^a user named "([^"]*)" exists$"#)]
async fn user_exists(world: &mut OaeWorld, user: String) {
    registration::ensure_user(world.context().or_fail(), &user)
        .await
        .or_fail();
}

#[then(regex = r"^the response status code is (\d{3})$")]
fn response_status(world: &mut OaeWorld, status: u16) {
    registration::verify_response_status(world.context().or_fail(), status).or_fail();
}

#[then(regex = r"^the new user is (created|not created)$")]
fn new_user_outcome(world: &mut OaeWorld, outcome: String) {
    registration::verify_registration(world.context().or_fail(), outcome == "created").or_fail();
}
