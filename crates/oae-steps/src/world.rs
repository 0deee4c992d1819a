//! Per-scenario state shared by the steps.

use cucumber::World;
use oae_client::{Exchange, Session};
use oae_core::{Error, GroupName, PoolId, Result, RunMarker, TagName, TargetConfig, User, UserName};
use std::sync::OnceLock;

static TARGET: OnceLock<TargetConfig> = OnceLock::new();

/// Sets the server every scenario of this process runs against.
///
/// Returns `false` if a target was already installed; the first one wins.
/// Without an installed target, scenarios read `OAE_*` environment variables.
pub fn install_target(config: TargetConfig) -> bool {
    TARGET.set(config).is_ok()
}

fn current_target() -> Result<TargetConfig> {
    TARGET
        .get()
        .map_or_else(TargetConfig::from_env, |config| Ok(config.clone()))
}

/// Outcome of the last self-registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The server created the user.
    Created(User),
    /// The server refused.
    Refused,
}

/// Everything a scenario remembers between steps.
///
/// Phrases name users, groups and tags without the run marker; the
/// context qualifies them before any request is sent.
#[derive(Debug)]
pub struct ScenarioContext {
    pub(crate) session: Session,
    pub(crate) marker: RunMarker,
    pub(crate) private_document: Option<PoolId>,
    pub(crate) document_title: Option<String>,
    pub(crate) last_response: Option<Exchange>,
    pub(crate) registration: Option<Registration>,
}

impl ScenarioContext {
    /// Creates a context with a fresh session acting as the administrator.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the HTTP client cannot be built.
    pub fn new(config: &TargetConfig, marker: RunMarker) -> Result<Self> {
        tracing::debug!(server = %config.server_url(), marker = %marker, "Starting scenario");
        Ok(Self {
            session: Session::new(config)?,
            marker,
            private_document: None,
            document_title: None,
            last_response: None,
            registration: None,
        })
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session for identity changes.
    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Returns the run marker.
    #[must_use]
    pub const fn marker(&self) -> &RunMarker {
        &self.marker
    }

    /// Qualifies a user name from a phrase.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the name is invalid.
    pub fn user_name(&self, name: &str) -> Result<UserName> {
        self.marker.user(name)
    }

    /// Qualifies a group name from a phrase.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the name is invalid.
    pub fn group_name(&self, name: &str) -> Result<GroupName> {
        self.marker.group(name)
    }

    /// Qualifies a tag from a phrase.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the tag is invalid.
    pub fn tag_name(&self, name: &str) -> Result<TagName> {
        self.marker.tag(name)
    }

    /// Identity of a test user named in a phrase.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the name is invalid.
    pub fn test_user(&self, name: &str) -> Result<User> {
        Ok(self.session.config().test_user(self.user_name(name)?))
    }

    /// Identity of the administrator.
    #[must_use]
    pub fn admin(&self) -> User {
        self.session.config().admin_user()
    }

    /// Pool id of the last private document created in this scenario.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingContext` if no document was created.
    pub fn private_document(&self) -> Result<&PoolId> {
        self.private_document
            .as_ref()
            .ok_or_else(|| Error::MissingContext {
                what: "private document (no step created one)".to_string(),
            })
    }

    /// Title of the last tagged document created in this scenario.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingContext` if no tagged document was created.
    pub fn document_title(&self) -> Result<&str> {
        self.document_title
            .as_deref()
            .ok_or_else(|| Error::MissingContext {
                what: "tagged document title (no step created one)".to_string(),
            })
    }

    /// Response of the last "try to" step.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingContext` if no such step ran.
    pub fn last_response(&self) -> Result<&Exchange> {
        self.last_response
            .as_ref()
            .ok_or_else(|| Error::MissingContext {
                what: "response (no step stored one)".to_string(),
            })
    }

    /// Outcome of the last self-registration attempt.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingContext` if no attempt was made.
    pub fn registration(&self) -> Result<&Registration> {
        self.registration
            .as_ref()
            .ok_or_else(|| Error::MissingContext {
                what: "registration attempt (no step tried to create a user)".to_string(),
            })
    }
}

/// Cucumber world.
///
/// The scenario context is built on first use so that a bad target
/// configuration fails the first step instead of aborting the run.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct OaeWorld {
    context: Option<ScenarioContext>,
}

impl OaeWorld {
    const fn new() -> Self {
        Self { context: None }
    }

    /// Creates a world around an existing context.
    #[must_use]
    pub const fn with_context(context: ScenarioContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Returns the scenario context, creating it from the installed target
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the target configuration is invalid.
    pub fn context(&mut self) -> Result<&mut ScenarioContext> {
        if self.context.is_none() {
            let config = current_target()?;
            self.context = Some(ScenarioContext::new(&config, RunMarker::generate())?);
        }

        self.context.as_mut().ok_or_else(|| Error::MissingContext {
            what: "scenario context".to_string(),
        })
    }
}
