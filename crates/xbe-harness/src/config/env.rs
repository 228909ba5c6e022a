// crates/xbe-harness/src/config/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed configuration for the conformance harness.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or set-but-empty values fail closed.
//! Precedence is: explicit overrides, then environment, then the optional
//! TOML file, then built-in defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::file::ConfigFile;
use crate::error::HarnessError;
use crate::logging::LogFormat;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default CLI command when `XBE_BIN` is unset.
pub const DEFAULT_XBE_BIN: &str = "xbe";
/// Default API base URL, matching the CLI's own default.
pub const DEFAULT_BASE_URL: &str = "https://app.x-b-e.com";
/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// CLI command, optionally with leading arguments.
    XbeBin,
    /// API base URL.
    BaseUrl,
    /// Primary API token.
    Token,
    /// Alternate API token name accepted by the CLI.
    ApiToken,
    /// Per-invocation timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Artifact directory for run summaries.
    RunRoot,
    /// Skip fixture teardown (`true`/`false` or `1`/`0`).
    KeepFixtures,
    /// Tracing filter directive.
    Log,
    /// Log output format (`text` or `json`).
    LogFormat,
    /// Optional TOML config file path.
    ConfigPath,
}

impl HarnessEnv {
    /// Every harness-level key, in documentation order.
    pub const ALL: [Self; 10] = [
        Self::XbeBin,
        Self::BaseUrl,
        Self::Token,
        Self::ApiToken,
        Self::TimeoutSeconds,
        Self::RunRoot,
        Self::KeepFixtures,
        Self::Log,
        Self::LogFormat,
        Self::ConfigPath,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XbeBin => "XBE_BIN",
            Self::BaseUrl => "XBE_BASE_URL",
            Self::Token => "XBE_TOKEN",
            Self::ApiToken => "XBE_API_TOKEN",
            Self::TimeoutSeconds => "XBE_TEST_TIMEOUT_SEC",
            Self::RunRoot => "XBE_TEST_RUN_ROOT",
            Self::KeepFixtures => "XBE_TEST_KEEP_FIXTURES",
            Self::Log => "XBE_TEST_LOG",
            Self::LogFormat => "XBE_TEST_LOG_FORMAT",
            Self::ConfigPath => "XBE_TEST_CONFIG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Values supplied on the command line; they beat every other source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overrides `XBE_BIN`.
    pub xbe_bin: Option<String>,
    /// Overrides `XBE_BASE_URL`.
    pub base_url: Option<String>,
    /// Overrides `XBE_TEST_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Overrides `XBE_TEST_LOG_FORMAT`.
    pub log_format: Option<LogFormat>,
}

/// Typed harness configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// CLI program followed by any leading arguments.
    pub xbe_command: Vec<String>,
    /// API base URL exported to the CLI and used for direct calls.
    pub base_url: String,
    /// Bearer token, when one is configured.
    pub token: Option<String>,
    /// Per-invocation timeout.
    pub timeout: Duration,
    /// Artifact directory for run summaries.
    pub run_root: Option<PathBuf>,
    /// When true, cleanup is logged and skipped.
    pub keep_fixtures: bool,
    /// Tracing filter directive.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Config file the values were merged from, if any.
    pub config_path: Option<PathBuf>,
    /// Fixture IDs from the config file, keyed by fixture slug.
    pub fixtures: BTreeMap<String, String>,
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("xbe_command", &self.xbe_command)
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("run_root", &self.run_root)
            .field("keep_fixtures", &self.keep_fixtures)
            .field("log_filter", &self.log_filter)
            .field("log_format", &self.log_format)
            .field("config_path", &self.config_path)
            .field("fixtures", &self.fixtures)
            .finish()
    }
}

impl HarnessConfig {
    /// Loads configuration from environment variables and the optional file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when an environment value is not valid
    /// UTF-8, is empty, or fails validation, or when the config file is
    /// unreadable.
    pub fn load() -> Result<Self, HarnessError> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// Loads configuration, applying command-line overrides first.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] on any invalid source value.
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self, HarnessError> {
        let config_path = match &overrides.config_path {
            Some(path) => Some(path.clone()),
            None => read_env_nonempty(HarnessEnv::ConfigPath.as_str())?.map(PathBuf::from),
        };
        let file = match &config_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let xbe_bin = first_of(overrides.xbe_bin.clone(), HarnessEnv::XbeBin, file.xbe_bin.clone())?
            .unwrap_or_else(|| DEFAULT_XBE_BIN.to_string());
        let xbe_command = parse_command(HarnessEnv::XbeBin.as_str(), &xbe_bin)?;

        let base_url =
            first_of(overrides.base_url.clone(), HarnessEnv::BaseUrl, file.base_url.clone())?
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(HarnessEnv::BaseUrl.as_str(), &base_url)?;

        let token = match read_env_nonempty(HarnessEnv::Token.as_str())? {
            Some(token) => Some(token),
            None => read_env_nonempty(HarnessEnv::ApiToken.as_str())?,
        };

        let timeout = match read_env_nonempty(HarnessEnv::TimeoutSeconds.as_str())? {
            Some(raw) => parse_timeout_seconds(HarnessEnv::TimeoutSeconds.as_str(), &raw)?,
            None => match file.timeout_sec {
                Some(0) => {
                    return Err(HarnessError::Config(
                        "timeout_sec must be greater than zero".to_string(),
                    ));
                }
                Some(secs) => Duration::from_secs(secs),
                None => DEFAULT_TIMEOUT,
            },
        };

        let run_root = read_env_nonempty(HarnessEnv::RunRoot.as_str())?
            .map(PathBuf::from)
            .or_else(|| file.run_root.clone());
        let keep_fixtures = parse_bool_env(
            HarnessEnv::KeepFixtures.as_str(),
            read_env_nonempty(HarnessEnv::KeepFixtures.as_str())?,
        )?;
        let log_filter = read_env_nonempty(HarnessEnv::Log.as_str())?
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_format = match overrides.log_format {
            Some(format) => format,
            None => match read_env_nonempty(HarnessEnv::LogFormat.as_str())? {
                Some(raw) => LogFormat::parse(&raw).ok_or_else(|| {
                    HarnessError::Config(format!(
                        "{} must be text or json",
                        HarnessEnv::LogFormat.as_str()
                    ))
                })?,
                None => LogFormat::Text,
            },
        };

        Ok(Self {
            xbe_command,
            base_url,
            token,
            timeout,
            run_root,
            keep_fixtures,
            log_filter,
            log_format,
            config_path,
            fixtures: file.fixtures,
        })
    }

    /// Returns a fixture ID from `var`, falling back to the file's fixtures table.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the variable is set but invalid.
    pub fn fixture_id(&self, var: &str, slug: &str) -> Result<Option<String>, HarnessError> {
        if let Some(value) = read_env_nonempty(var)? {
            return Ok(Some(value.trim().to_string()));
        }
        Ok(self.fixtures.get(slug).cloned())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, HarnessError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| HarnessError::Config(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, HarnessError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(HarnessError::Config(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Picks the override, then the env var, then the file value.
fn first_of(
    overridden: Option<String>,
    env: HarnessEnv,
    file: Option<String>,
) -> Result<Option<String>, HarnessError> {
    if overridden.is_some() {
        return Ok(overridden);
    }
    if let Some(value) = read_env_nonempty(env.as_str())? {
        return Ok(Some(value));
    }
    Ok(file)
}

/// Splits a command string into program and leading arguments.
fn parse_command(name: &str, raw: &str) -> Result<Vec<String>, HarnessError> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(HarnessError::Config(format!("{name} must name a program")));
    }
    Ok(parts)
}

/// Validates a base URL and strips any trailing slash.
fn parse_base_url(name: &str, raw: &str) -> Result<String, HarnessError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|err| HarnessError::Config(format!("{name} is not a valid URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HarnessError::Config(format!("{name} must use http or https")));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, HarnessError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        HarnessError::Config(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(HarnessError::Config(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a boolean environment variable with permissive defaults.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, HarnessError> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(HarnessError::Config(format!("{name} must be 1, 0, true, or false")))
}
