//! tcpwait — entry point.
//!
//! Waits until every given TCP endpoint accepts a connection, then optionally
//! runs a command.  Typical use is in container entrypoints and CI scripts:
//!
//! ```text
//! tcpwait -t 30s -a db:5432 -a cache:6379 ./start-server --port 8080
//! ```
//!
//! # Usage
//!
//! ```text
//! tcpwait [-t timeout] [-c connect-timeout] [-i interval] [--on s|f|any]
//!         [-q] [-v] [-a host:port ...] [--config FILE] [command [args]]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                  | Default | Description                       |
//! |---------------------------|---------|-----------------------------------|
//! | `TCPWAIT_TIMEOUT`         | `0`     | Shared deadline (0 = none)        |
//! | `TCPWAIT_CONNECT_TIMEOUT` | timeout | Per-attempt connect timeout       |
//! | `TCPWAIT_INTERVAL`        | `1s`    | Pause between retries             |
//! | `TCPWAIT_ON`              | `s`     | When to run the command           |
//! | `TCPWAIT_ADDRESSES`       | —       | Comma-separated endpoints         |
//! | `TCPWAIT_CONFIG`          | —       | Path to a TOML config file        |
//!
//! # Exit codes
//!
//! | Code  | Meaning                                              |
//! |-------|------------------------------------------------------|
//! | 0     | All endpoints connected (or the command succeeded)   |
//! | 1     | Timeout, invalid address, or command failed to start |
//! | 22    | Invalid usage                                        |
//! | 130   | Interrupted with Ctrl+C                              |
//! | other | The command's own exit code                          |

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tcpwait::application::{build_config, run, EXIT_INVALID_USAGE, EXIT_SUCCESS};
use tcpwait::domain::{ConfigError, Settings};
use tcpwait::infrastructure::config_file::{load_settings, parse_duration};
use tcpwait::infrastructure::logging;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wait for TCP endpoints to become reachable, then run a command.
#[derive(Debug, Parser)]
#[command(
    name = "tcpwait",
    about = "Wait for TCP endpoints to become reachable, then run a command",
    version
)]
struct Cli {
    /// Shared timeout across all endpoints, e.g. '5s' or '100ms'.
    ///
    /// Zero (the default) waits forever.
    #[arg(short = 't', long, value_name = "DURATION", value_parser = parse_duration, env = "TCPWAIT_TIMEOUT")]
    timeout: Option<Duration>,

    /// Timeout for a single connect attempt.
    ///
    /// Defaults to the shared timeout.
    #[arg(short = 'c', long, value_name = "DURATION", value_parser = parse_duration, env = "TCPWAIT_CONNECT_TIMEOUT")]
    connect_timeout: Option<Duration>,

    /// Interval between retries [default: 1s].
    #[arg(short = 'i', long, value_name = "DURATION", value_parser = parse_duration, env = "TCPWAIT_INTERVAL")]
    interval: Option<Duration>,

    /// When to execute the command: 's' after success, 'f' after failure,
    /// 'any' always [default: s].
    #[arg(long = "on", value_name = "s|f|any", env = "TCPWAIT_ON")]
    on: Option<String>,

    /// Do not print anything.
    #[arg(short, long)]
    quiet: bool,

    /// Print every connection attempt.
    #[arg(short, long)]
    verbose: bool,

    /// Endpoint to await, in the form 'host:port'.  Repeatable.
    #[arg(
        short = 'a',
        long = "address",
        value_name = "HOST:PORT",
        env = "TCPWAIT_ADDRESSES",
        value_delimiter = ','
    )]
    addresses: Vec<String>,

    /// TOML file supplying defaults for any of the options above.
    #[arg(long, value_name = "FILE", env = "TCPWAIT_CONFIG")]
    config: Option<PathBuf>,

    /// Command (and arguments) to execute after the wait finishes.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Cli {
    /// Converts the parsed arguments into [`Settings`], layered over the
    /// config file when one is given.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config file cannot be read or parsed.
    fn into_settings(self) -> Result<Settings, ConfigError> {
        let file = match &self.config {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        let cli = Settings {
            addresses: self.addresses,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            interval: self.interval,
            on: self.on,
            quiet: self.quiet,
            verbose: self.verbose,
            command: self.command,
        };
        Ok(cli.layered_over(file))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse the CLI and layer it over the optional config file.
/// 2. Install the `tracing` subscriber (stderr; level from `-q` / `-v`).
/// 3. Validate the settings and resolve every endpoint.  Any failure here
///    exits with code 22 before a single probe is sent.
/// 4. Wait, apply the run policy, and exit with the resulting code.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (cli_quiet, cli_verbose) = (cli.quiet, cli.verbose);

    let settings = match cli.into_settings() {
        Ok(settings) => settings,
        Err(err) => {
            // The file never loaded, so only the command-line flags apply.
            init_logging(cli_quiet, cli_verbose);
            return invalid_usage(&err, cli_quiet);
        }
    };

    init_logging(settings.quiet, settings.verbose);

    let quiet = settings.quiet;
    let config = match build_config(settings).await {
        Ok(config) => config,
        Err(err) => return invalid_usage(&err, quiet),
    };

    // Ctrl+C cancels the wait; the run module maps that to exit code 130.
    let shutdown = CancellationToken::new();
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, stopping");
                on_ctrl_c.cancel();
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    match run(&config, &shutdown).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => ExitCode::from(err.exit_code()),
    }
}

/// Installs the subscriber, reporting a failure on plain stderr.
fn init_logging(quiet: bool, verbose: bool) {
    if let Err(err) = logging::init(quiet, verbose) {
        if !quiet {
            eprintln!("tcpwait: {err:#}");
        }
    }
}

/// Reports a configuration error together with the usage line.
fn invalid_usage(err: &ConfigError, quiet: bool) -> ExitCode {
    error!("{err}");
    if !quiet {
        eprintln!("{}", Cli::command().render_usage());
    }
    ExitCode::from(EXIT_INVALID_USAGE)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
