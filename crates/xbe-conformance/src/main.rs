// crates/xbe-conformance/src/main.rs
// ============================================================================
// Module: XBE Conformance CLI Entry Point
// Description: Command dispatcher for running, listing, and checking suites.
// Purpose: Turn a conformance run into a printed report and a CI exit code.
// Dependencies: clap, thiserror, tokio, xbe-conformance, xbe-harness
// ============================================================================

//! ## Overview
//! `run` executes the selected suites and exits 0 when nothing failed, 1 when
//! a case failed, and 2 when configuration or startup failed. `list` prints
//! the suite registry. `check-env` prints the resolved configuration with the
//! token redacted, plus which fixture IDs are available.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;
use xbe_conformance::RunOptions;
use xbe_conformance::SuiteId;
use xbe_conformance::run_suites;
use xbe_harness::ConfigOverrides;
use xbe_harness::FixtureKind;
use xbe_harness::HarnessConfig;
use xbe_harness::HarnessError;
use xbe_harness::LogFormat;
use xbe_harness::logging;
use xbe_harness::report::EXIT_HARNESS_ERROR;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "xbe-conformance", disable_help_subcommand = true)]
struct Cli {
    /// CLI command to test (overrides `XBE_BIN`).
    #[arg(long, value_name = "COMMAND", global = true)]
    xbe_bin: Option<String>,
    /// API base URL (overrides `XBE_BASE_URL`).
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,
    /// TOML config file (overrides `XBE_TEST_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Log output format (overrides `XBE_TEST_LOG_FORMAT`).
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormatArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run conformance suites.
    Run(RunCommand),
    /// List available suites.
    List,
    /// Show the resolved configuration and fixture availability.
    CheckEnv,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Suite to run; repeatable. Runs every suite when omitted.
    #[arg(long = "suite", value_enum, value_name = "NAME")]
    suites: Vec<SuiteId>,
    /// Stop after the first suite with a failing case.
    #[arg(long)]
    fail_fast: bool,
}

/// Log format flag values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormatArg {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Availability of one fixture ID for `check-env`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FixtureAvailability {
    /// An ID is configured.
    Set(String),
    /// Neither the environment nor the file supplies one.
    Unset,
    /// The variable is set but unusable.
    Invalid(String),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for configuration and startup failures.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        Self::new(err.to_string())
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        xbe_bin: cli.xbe_bin,
        base_url: cli.base_url,
        config_path: cli.config,
        log_format: cli.log_format.map(LogFormat::from),
    };
    match cli.command {
        Commands::Run(command) => command_run(&overrides, command).await,
        Commands::List => command_list(),
        Commands::CheckEnv => command_check_env(&overrides),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `run`.
async fn command_run(overrides: &ConfigOverrides, command: RunCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load_with(overrides)?;
    logging::init(&config.log_filter, config.log_format)?;
    let options = RunOptions {
        suites: command.suites,
        fail_fast: command.fail_fast,
    };
    tracing::info!(
        suites = options.selected().len(),
        base_url = %config.base_url,
        "conformance run started"
    );
    let report = run_suites(&config, &options).await?;
    write_stdout(&report.render_text())?;
    if let Some(root) = &config.run_root {
        for path in report.write_artifacts(root)? {
            write_stderr_line(&format!("wrote {}", path.display()))
                .map_err(|err| output_error("stderr", &err))?;
        }
    }
    Ok(ExitCode::from(report.summary.exit_code()))
}

/// Executes `list`.
fn command_list() -> CliResult<ExitCode> {
    write_stdout(&render_suite_list())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `check-env`.
fn command_check_env(overrides: &ConfigOverrides) -> CliResult<ExitCode> {
    let config = HarnessConfig::load_with(overrides)?;
    let fixtures: Vec<(FixtureKind, FixtureAvailability)> = FixtureKind::ALL
        .into_iter()
        .map(|kind| {
            let availability = match config.fixture_id(kind.env_var(), kind.slug()) {
                Ok(Some(id)) => FixtureAvailability::Set(id),
                Ok(None) => FixtureAvailability::Unset,
                Err(err) => FixtureAvailability::Invalid(err.to_string()),
            };
            (kind, availability)
        })
        .collect();
    write_stdout(&render_env_report(&config, &fixtures))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the suite registry, one `name  description` line per suite.
fn render_suite_list() -> String {
    let width = SuiteId::ALL.iter().map(|id| id.name().len()).max().unwrap_or(0);
    SuiteId::ALL
        .iter()
        .map(|id| format!("{:<width$}  {}\n", id.name(), id.description()))
        .collect()
}

/// Renders the resolved configuration for `check-env`. Never prints the token.
fn render_env_report(
    config: &HarnessConfig,
    fixtures: &[(FixtureKind, FixtureAvailability)],
) -> String {
    let optional_path = |path: Option<&PathBuf>| {
        path.map_or_else(|| "(none)".to_string(), |path| path.display().to_string())
    };
    let mut lines = vec![
        format!("xbe_command: {}", config.xbe_command.join(" ")),
        format!("base_url: {}", config.base_url),
        format!("token: {}", if config.token.is_some() { "<redacted>" } else { "(unset)" }),
        format!("timeout_sec: {}", config.timeout.as_secs()),
        format!("run_root: {}", optional_path(config.run_root.as_ref())),
        format!("keep_fixtures: {}", config.keep_fixtures),
        format!("log_filter: {}", config.log_filter),
        format!("log_format: {}", config.log_format.as_str()),
        format!("config_path: {}", optional_path(config.config_path.as_ref())),
        "fixtures:".to_string(),
    ];
    for (kind, availability) in fixtures {
        let state = match availability {
            FixtureAvailability::Set(id) => format!("set ({id})"),
            FixtureAvailability::Unset => "unset".to_string(),
            FixtureAvailability::Invalid(reason) => format!("invalid: {reason}"),
        };
        lines.push(format!("  {}: {state}", kind.env_var()));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes pre-rendered text to stdout.
fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| output_error("stdout", &err))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Builds an output error for `stream`.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write {stream}: {error}"))
}

/// Emits an error message and returns the harness-error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_HARNESS_ERROR)
}
