//! Feature file execution.

use crate::OaeWorld;
use clap::Parser as _;
use cucumber::writer::Stats as _;
use cucumber::{World as _, cli, gherkin};
use serde::Serialize;
use std::path::PathBuf;

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Feature file or directory of feature files
    pub features: PathBuf,
    /// Run only scenarios carrying one of these tags (`@` optional)
    pub tags: Vec<String>,
    /// Stop after the first failed step
    pub fail_fast: bool,
}

impl RunOptions {
    /// Runs every scenario under `features`.
    #[must_use]
    pub fn new(features: impl Into<PathBuf>) -> Self {
        Self {
            features: features.into(),
            tags: Vec::new(),
            fail_fast: false,
        }
    }
}

/// Step counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Steps that passed
    pub passed_steps: usize,
    /// Steps that were skipped
    pub skipped_steps: usize,
    /// Steps that failed
    pub failed_steps: usize,
    /// Feature files that could not be parsed
    pub parsing_errors: usize,
    /// Failed before or after hooks
    pub hook_errors: usize,
    /// Whether the run counts as failed
    pub failed: bool,
}

fn tag_matches(wanted: &[String], tags: &[String]) -> bool {
    tags.iter()
        .any(|tag| wanted.iter().any(|w| w == tag.trim_start_matches('@')))
}

/// Returns `true` if a scenario is selected by `wanted` tags.
///
/// Tags on the feature and the rule count for every scenario inside them.
#[must_use]
pub fn selected(
    wanted: &[String],
    feature: &gherkin::Feature,
    rule: Option<&gherkin::Rule>,
    scenario: &gherkin::Scenario,
) -> bool {
    wanted.is_empty()
        || tag_matches(wanted, &feature.tags)
        || rule.is_some_and(|rule| tag_matches(wanted, &rule.tags))
        || tag_matches(wanted, &scenario.tags)
}

/// Runs the feature files one scenario at a time.
///
/// The target server must have been installed with
/// [`install_target`](crate::install_target) beforehand, or be described by
/// the `OAE_*` environment variables. Cucumber prints its progress to
/// stdout.
pub async fn run_features(options: &RunOptions) -> RunSummary {
    let wanted: Vec<String> = options
        .tags
        .iter()
        .map(|tag| tag.trim_start_matches('@').to_string())
        .collect();

    tracing::info!(
        features = %options.features.display(),
        tags = ?wanted,
        fail_fast = options.fail_fast,
        "Running features"
    );

    // Process arguments belong to the caller, not to cucumber.
    let cli = cli::Opts::<_, _, _, cli::Empty>::parse_from(["oae-acceptance"]);

    let mut cucumber = OaeWorld::cucumber()
        .max_concurrent_scenarios(1)
        .with_cli(cli);
    if options.fail_fast {
        cucumber = cucumber.fail_fast();
    }

    let writer = cucumber
        .filter_run(options.features.clone(), move |feature, rule, scenario| {
            selected(&wanted, feature, rule, scenario)
        })
        .await;

    let summary = RunSummary {
        passed_steps: writer.passed_steps(),
        skipped_steps: writer.skipped_steps(),
        failed_steps: writer.failed_steps(),
        parsing_errors: writer.parsing_errors(),
        hook_errors: writer.hook_errors(),
        failed: writer.execution_has_failed(),
    };

    tracing::info!(
        passed = summary.passed_steps,
        failed = summary.failed_steps,
        skipped = summary.skipped_steps,
        "Run finished"
    );
    summary
}
