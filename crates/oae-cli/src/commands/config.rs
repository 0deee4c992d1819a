//! Config command implementation.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/oae-acceptance/config.toml`
//! - macOS: `~/Library/Application Support/oae-acceptance/config.toml`
//! - Windows: `%APPDATA%\oae-acceptance\config.toml`

use crate::actions::ConfigAction;
use anyhow::{Context, Result};
use oae_core::cli::{ExitCode, OutputFormat};
use oae_core::{TargetConfig, env};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const REDACTED: &str = "********";

const KEYS: &[&str] = &[
    "general.default_format",
    "general.log_level",
    "server.url",
    "server.admin_user",
    "server.admin_password",
    "server.test_password",
    "server.timeout_seconds",
    "server.index_wait_ms",
];

/// CLI configuration.
///
/// # Examples
///
/// ```toml
/// [general]
/// default_format = "pretty"
/// log_level = "info"
///
/// [server]
/// url = "http://localhost:8080/"
/// admin_user = "admin"
/// admin_password = "admin"
/// test_password = "testuser"
/// timeout_seconds = 30
/// index_wait_ms = 1000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Server under test
    #[serde(default)]
    pub server: ServerConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL
    pub url: String,

    /// Administrator account
    pub admin_user: String,

    /// Administrator password
    pub admin_password: String,

    /// Password of the users scenarios create
    pub test_password: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Delay after indexing-sensitive writes, in milliseconds
    pub index_wait_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: "pretty".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/".to_string(),
            admin_user: "admin".to_string(),
            admin_password: "admin".to_string(),
            test_password: "testuser".to_string(),
            timeout_seconds: 30,
            index_wait_ms: 1000,
        }
    }
}

impl ServerConfig {
    /// Value of the `OAE_*` variable with the same meaning.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            env::SERVER_URL => Some(self.url.clone()),
            env::ADMIN_USER => Some(self.admin_user.clone()),
            env::ADMIN_PASSWORD => Some(self.admin_password.clone()),
            env::TEST_PASSWORD => Some(self.test_password.clone()),
            env::TIMEOUT_SECS => Some(self.timeout_seconds.to_string()),
            env::INDEX_WAIT_MS => Some(self.index_wait_ms.to_string()),
            _ => None,
        }
    }

    /// Builds the target these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is rejected by [`TargetConfig`].
    pub fn to_target(&self) -> Result<TargetConfig> {
        TargetConfig::builder()
            .server_url(self.url.as_str())
            .admin_name(self.admin_user.as_str())
            .admin_password(self.admin_password.as_str())
            .test_password(self.test_password.as_str())
            .request_timeout(Duration::from_secs(self.timeout_seconds))
            .index_wait(Duration::from_millis(self.index_wait_ms))
            .build()
            .map_err(|e| anyhow::anyhow!("invalid [server] configuration: {e}"))
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let valid_formats = ["json", "text", "pretty"];
        if !valid_formats.contains(&self.general.default_format.as_str()) {
            anyhow::bail!(
                "invalid default_format '{}', must be one of: {}",
                self.general.default_format,
                valid_formats.join(", ")
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            anyhow::bail!(
                "invalid log_level '{}', must be one of: {}",
                self.general.log_level,
                valid_levels.join(", ")
            );
        }

        url::Url::parse(&self.server.url)
            .with_context(|| format!("invalid server.url '{}'", self.server.url))?;

        if self.server.timeout_seconds == 0 {
            anyhow::bail!("server.timeout_seconds must be greater than 0");
        }

        if self.server.timeout_seconds > 600 {
            anyhow::bail!("server.timeout_seconds cannot exceed 600 seconds (10 minutes)");
        }

        if self.server.index_wait_ms > 60_000 {
            anyhow::bail!("server.index_wait_ms cannot exceed 60000 (1 minute)");
        }

        self.server.to_target()?;

        Ok(())
    }

    /// Returns a copy with the passwords masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.server.admin_password = REDACTED.to_string();
        config.server.test_password = REDACTED.to_string();
        config
    }
}

/// Gets the default configuration file path.
///
/// # Errors
///
/// Returns an error if the platform has no configuration directory.
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;

    Ok(config_dir.join("oae-acceptance").join("config.toml"))
}

/// Loads the configuration file, or defaults if there is none.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Loads configuration from `path`, or defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).context("failed to read config file")?;

    let config: Config = toml::from_str(&content).context("failed to parse config file")?;

    config.validate()?;

    Ok(config)
}

/// Validates and writes `config` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if validation or writing fails.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    let toml_str = toml::to_string_pretty(config).context("failed to serialize config")?;

    fs::write(path, toml_str).context("failed to write config file")?;

    debug!("Saved config to {}", path.display());

    Ok(())
}

/// Gets a configuration value by key path (e.g., "server.url").
///
/// Passwords are returned as written.
#[must_use]
pub fn get_config_value_by_key(config: &Config, key: &str) -> Option<String> {
    match key {
        "general.default_format" => Some(config.general.default_format.clone()),
        "general.log_level" => Some(config.general.log_level.clone()),

        "server.url" => Some(config.server.url.clone()),
        "server.admin_user" => Some(config.server.admin_user.clone()),
        "server.admin_password" => Some(config.server.admin_password.clone()),
        "server.test_password" => Some(config.server.test_password.clone()),
        "server.timeout_seconds" => Some(config.server.timeout_seconds.to_string()),
        "server.index_wait_ms" => Some(config.server.index_wait_ms.to_string()),

        _ => None,
    }
}

/// Sets a configuration value by key path.
///
/// # Errors
///
/// Returns an error for unknown keys and non-numeric values of numeric keys.
pub fn set_config_value_by_key(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "general.default_format" => {
            config.general.default_format = value.to_string();
        }
        "general.log_level" => {
            config.general.log_level = value.to_string();
        }

        "server.url" => {
            config.server.url = value.to_string();
        }
        "server.admin_user" => {
            config.server.admin_user = value.to_string();
        }
        "server.admin_password" => {
            config.server.admin_password = value.to_string();
        }
        "server.test_password" => {
            config.server.test_password = value.to_string();
        }
        "server.timeout_seconds" => {
            config.server.timeout_seconds = value
                .parse()
                .context("invalid value for timeout_seconds, must be a number")?;
        }
        "server.index_wait_ms" => {
            config.server.index_wait_ms = value
                .parse()
                .context("invalid value for index_wait_ms, must be a number")?;
        }

        _ => anyhow::bail!("unknown configuration key: {key}"),
    }

    Ok(())
}

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Path of the configuration file
    pub path: String,
}

/// Configuration value result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigValue {
    /// Configuration key
    pub key: String,
    /// Configuration value
    pub value: String,
}

/// Set configuration result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SetResult {
    /// Whether set was successful
    pub success: bool,
    /// The key that was set
    pub key: String,
    /// The new value
    pub value: String,
    /// Status message
    pub message: String,
}

/// Runs the config command against the default configuration file.
///
/// # Errors
///
/// Returns an error if configuration operation fails.
pub async fn run(action: ConfigAction, output_format: OutputFormat) -> Result<ExitCode> {
    run_at(action, &config_path()?, output_format).await
}

/// Runs the config command against the file at `path`.
///
/// # Errors
///
/// Returns an error if configuration operation fails.
pub async fn run_at(action: ConfigAction, path: &Path, output_format: OutputFormat) -> Result<ExitCode> {
    info!(?action, path = %path.display(), "Config command");

    let output = match action {
        ConfigAction::Init => init_config(path, output_format)?,
        ConfigAction::Show => show_config(path, output_format)?,
        ConfigAction::Get { key } => get_config(path, key, output_format)?,
        ConfigAction::Set { key, value } => set_config(path, key, value, output_format)?,
    };
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}

/// Creates a default configuration file. An existing file is left alone.
fn init_config(path: &Path, output_format: OutputFormat) -> Result<String> {
    let result = if path.exists() {
        InitResult {
            success: false,
            message: "configuration file already exists".to_string(),
            path: path.display().to_string(),
        }
    } else {
        save_config_to(&Config::default(), path)?;
        InitResult {
            success: true,
            message: "configuration file created with default values".to_string(),
            path: path.display().to_string(),
        }
    };

    crate::formatters::format_output(&result, output_format).context("failed to format init result")
}

fn show_config(path: &Path, output_format: OutputFormat) -> Result<String> {
    let config = load_config_from(path)?;

    crate::formatters::format_output(&config.redacted(), output_format)
        .context("failed to format configuration")
}

fn get_config(path: &Path, key: String, output_format: OutputFormat) -> Result<String> {
    let config = load_config_from(path)?;

    let Some(value) = get_config_value_by_key(&config, &key) else {
        anyhow::bail!(
            "configuration key '{key}' not found\n\nAvailable keys:\n{}",
            KEYS.iter()
                .map(|k| format!("- {k}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    };

    crate::formatters::format_output(&ConfigValue { key, value }, output_format)
        .context("failed to format config value")
}

fn set_config(path: &Path, key: String, value: String, output_format: OutputFormat) -> Result<String> {
    let mut config = load_config_from(path)?;

    set_config_value_by_key(&mut config, &key, &value)?;
    save_config_to(&config, path)?;

    let result = SetResult {
        success: true,
        message: format!("set '{key}' to '{value}'"),
        key,
        value,
    };

    crate::formatters::format_output(&result, output_format).context("failed to format result")
}
