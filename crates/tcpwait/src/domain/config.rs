//! Configuration types.
//!
//! Configuration flows through two stages:
//!
//! ```text
//! CLI flags ─┐
//!            ├─ Settings (raw, layered) ── check() ── resolve ──▶ WaitConfig
//! TOML file ─┘
//! ```
//!
//! [`Settings`] holds whatever the user supplied, with `None` for anything
//! left unset.  [`WaitConfig`] is the validated value the application runs
//! with: every endpoint resolved, every default applied.  Both are plain
//! structs passed around explicitly; there is no global configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use tcpwait_core::coordinator::DEFAULT_RETRY_INTERVAL;
use tcpwait_core::{AddressError, Endpoint, WaitOptions};

use super::policy::RunPolicy;

/// Configuration problems detected before any endpoint is probed.
///
/// All of these map to the "invalid usage" exit code.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `-a` flag and no `endpoints` in the config file.
    #[error("no endpoints provided")]
    NoEndpoints,

    /// `--on` was not one of the three accepted tokens.
    #[error("only 's' or 'f' or 'any' are allowed for '--on' argument, got {0:?}")]
    UnknownPolicy(String),

    /// `--interval` was zero.
    #[error("retry interval must be greater than zero")]
    ZeroInterval,

    /// An endpoint failed validation.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The config file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A duration in the config file could not be parsed.
    #[error("invalid duration {value:?} for '{key}': {source}")]
    Duration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

/// Raw, unvalidated settings from one source (CLI or config file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Endpoint addresses as typed by the user.
    pub addresses: Vec<String>,
    /// Shared deadline; `None` or zero means unbounded.
    pub timeout: Option<Duration>,
    /// Per-attempt connect timeout; `None` follows `timeout`.
    pub connect_timeout: Option<Duration>,
    /// Pause between retries; `None` means one second.
    pub interval: Option<Duration>,
    /// `--on` token; `None` means `s`.
    pub on: Option<String>,
    /// Suppress all output.
    pub quiet: bool,
    /// Emit per-attempt debug lines.
    pub verbose: bool,
    /// Post-check command and its arguments.
    pub command: Vec<String>,
}

impl Settings {
    /// Layers `self` over `lower`.
    ///
    /// Scalar values set in `self` win.  Addresses are concatenated, `self`
    /// first, so endpoints from the CLI are probed alongside those from the
    /// config file.
    pub fn layered_over(self, lower: Settings) -> Settings {
        let mut addresses = self.addresses;
        addresses.extend(lower.addresses);
        Settings {
            addresses,
            timeout: self.timeout.or(lower.timeout),
            connect_timeout: self.connect_timeout.or(lower.connect_timeout),
            interval: self.interval.or(lower.interval),
            on: self.on.or(lower.on),
            quiet: self.quiet || lower.quiet,
            verbose: self.verbose || lower.verbose,
            command: if self.command.is_empty() {
                lower.command
            } else {
                self.command
            },
        }
    }

    /// Checks everything that can be checked without I/O and returns the
    /// parsed policy.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoEndpoints`], [`ConfigError::UnknownPolicy`] or
    /// [`ConfigError::ZeroInterval`].
    pub fn check(&self) -> Result<RunPolicy, ConfigError> {
        if self.addresses.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        let policy = match self.on.as_deref() {
            Some(token) => token.parse()?,
            None => RunPolicy::default(),
        };
        if self.interval.is_some_and(|i| i.is_zero()) {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(policy)
    }
}

/// The validated configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitConfig {
    /// Resolved endpoints, in the order given.
    pub endpoints: Vec<Endpoint>,
    /// Per-attempt connect timeout (zero means unbounded).
    pub connect_timeout: Duration,
    /// Retry interval and shared deadline.
    pub wait: WaitOptions,
    /// Suppress all output.
    pub quiet: bool,
    /// Emit per-attempt debug lines.
    pub verbose: bool,
    /// When to run `command`.
    pub policy: RunPolicy,
    /// Post-check command and its arguments (may be empty).
    pub command: Vec<String>,
}

impl WaitConfig {
    /// Builds a config from checked settings and already-resolved endpoints.
    ///
    /// Applies the defaults: one second between retries, no shared deadline,
    /// and a connect timeout equal to the shared deadline.
    pub fn from_settings(settings: Settings, policy: RunPolicy, endpoints: Vec<Endpoint>) -> Self {
        let overall_timeout = settings.timeout.unwrap_or(Duration::ZERO);
        Self {
            endpoints,
            connect_timeout: settings.connect_timeout.unwrap_or(overall_timeout),
            wait: WaitOptions {
                retry_interval: settings.interval.unwrap_or(DEFAULT_RETRY_INTERVAL),
                overall_timeout,
            },
            quiet: settings.quiet,
            verbose: settings.verbose,
            policy,
            command: settings.command,
        }
    }

    /// `true` when neither a connect timeout nor a shared deadline bounds a
    /// dial.  A blackholed endpoint then holds its attempt open for as long
    /// as the operating system allows.
    pub fn dial_is_unbounded(&self) -> bool {
        self.connect_timeout.is_zero() && self.wait.overall_timeout.is_zero()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
