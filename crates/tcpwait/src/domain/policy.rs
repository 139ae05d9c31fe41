//! When to run the post-check command.

use std::fmt;
use std::str::FromStr;

use super::config::ConfigError;

/// The tri-state policy selected with `--on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPolicy {
    /// `s` – run only when every endpoint connected.
    #[default]
    OnSuccess,
    /// `f` – run only when the wait failed.
    OnFailure,
    /// `any` – run regardless of the outcome.
    Always,
}

impl RunPolicy {
    /// Decides whether the command runs given the wait's outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tcpwait::domain::RunPolicy;
    ///
    /// assert!(RunPolicy::OnSuccess.should_run(true));
    /// assert!(!RunPolicy::OnSuccess.should_run(false));
    /// assert!(RunPolicy::Always.should_run(false));
    /// ```
    pub fn should_run(self, wait_succeeded: bool) -> bool {
        match self {
            RunPolicy::OnSuccess => wait_succeeded,
            RunPolicy::OnFailure => !wait_succeeded,
            RunPolicy::Always => true,
        }
    }

    /// The token accepted on the command line.
    pub fn token(self) -> &'static str {
        match self {
            RunPolicy::OnSuccess => "s",
            RunPolicy::OnFailure => "f",
            RunPolicy::Always => "any",
        }
    }
}

impl FromStr for RunPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(RunPolicy::OnSuccess),
            "f" => Ok(RunPolicy::OnFailure),
            "any" => Ok(RunPolicy::Always),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
