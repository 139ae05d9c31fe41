//! Optional TOML config file (`--config FILE`).
//!
//! Every key is optional.  Durations use the same syntax as the command line.
//!
//! ```toml
//! timeout = "30s"
//! connect_timeout = "2s"
//! interval = "500ms"
//! on = "s"
//! endpoints = ["db:5432", "cache:6379"]
//! command = ["./migrate", "--all"]
//! ```
//!
//! Unknown keys are rejected so that a typo (`intervall`) fails loudly instead
//! of silently falling back to a default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ConfigError, Settings};

/// On-disk schema of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Shared deadline, e.g. `"30s"`.
    pub timeout: Option<String>,
    /// Per-attempt connect timeout, e.g. `"2s"`.
    pub connect_timeout: Option<String>,
    /// Pause between retries, e.g. `"500ms"`.
    pub interval: Option<String>,
    /// Run policy token: `"s"`, `"f"` or `"any"`.
    pub on: Option<String>,
    /// Endpoints to wait for, appended after any given with `-a`.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Suppress all output.
    #[serde(default)]
    pub quiet: bool,
    /// Emit per-attempt debug lines.
    #[serde(default)]
    pub verbose: bool,
    /// Post-check command, used when none is given on the command line.
    #[serde(default)]
    pub command: Vec<String>,
}

impl FileConfig {
    /// Converts the file's strings into typed [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Duration`] naming the offending key when a
    /// duration does not parse.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            addresses: self.endpoints,
            timeout: parse_optional("timeout", self.timeout)?,
            connect_timeout: parse_optional("connect_timeout", self.connect_timeout)?,
            interval: parse_optional("interval", self.interval)?,
            on: self.on,
            quiet: self.quiet,
            verbose: self.verbose,
            command: self.command,
        })
    }
}

/// Parses a human-readable duration (`"5s"`, `"100ms"`, `"1m30s"`).
///
/// A bare `"0"` is accepted as zero, so `-t 0` means "no timeout".
pub fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    if value.trim() == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(value)
}

fn parse_optional(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|value| {
            parse_duration(&value).map_err(|source| ConfigError::Duration {
                key,
                value: value.clone(),
                source,
            })
        })
        .transpose()
}

/// Parses config file `content`; `path` is only used in error messages.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed TOML or unknown keys, and
/// [`ConfigError::Duration`] for unparseable durations.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, ConfigError> {
    let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    file.into_settings()
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read (including when it does not
/// exist: a file named explicitly must be present), otherwise as
/// [`parse_settings`].
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content, path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
