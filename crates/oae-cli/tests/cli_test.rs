//! Integration tests for the command layer.

use clap::Parser;
use oae_cli::ConfigAction;
use oae_cli::cli::{Cli, Commands};
use oae_cli::commands::config::{self, Config};
use oae_cli::runner::execute_command;
use oae_core::cli::{ExitCode, OutputFormat};
use tempfile::TempDir;

/// Tests that parsed arguments dispatch to the steps command.
#[tokio::test]
async fn test_steps_command_dispatch() {
    let cli = Cli::parse_from(["oae-acceptance", "steps", "--filter", "captcha"]);
    let code = execute_command(cli.command, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

/// Tests that a run against a missing feature directory is rejected
/// before any server is contacted.
#[tokio::test]
async fn test_run_command_missing_features() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("features");
    let cli = Cli::parse_from([
        "oae-acceptance",
        "run",
        missing.to_str().unwrap(),
        "--server",
        "http://127.0.0.1:9",
    ]);

    let code = execute_command(cli.command, OutputFormat::Json)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::INVALID_INPUT);
}

/// Tests that completions dispatch succeeds.
#[tokio::test]
async fn test_completions_dispatch() {
    let cli = Cli::parse_from(["oae-acceptance", "completions", "bash"]);
    assert!(matches!(cli.command, Commands::Completions { .. }));
    let code = execute_command(cli.command, OutputFormat::Pretty)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

/// Tests a config file written by `config set` reaches the run target.
#[tokio::test]
async fn test_configured_server_becomes_target() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    config::run_at(ConfigAction::Init, &path, OutputFormat::Json)
        .await
        .unwrap();
    config::run_at(
        ConfigAction::Set {
            key: "server.url".to_string(),
            value: "http://oae.example.edu:8080".to_string(),
        },
        &path,
        OutputFormat::Json,
    )
    .await
    .unwrap();

    let file: Config = config::load_config_from(&path).unwrap();
    let target =
        oae_cli::commands::run::resolve_target(None, file.server, |_| None).unwrap();
    assert_eq!(target.server_url().as_str(), "http://oae.example.edu:8080/");
    assert_eq!(target.referer(), "http://oae.example.edu:8080/dev/integrationtests");
}
