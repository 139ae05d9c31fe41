//! The run use case: wait, report, then maybe execute the post-check command.
//!
//! # Flow
//!
//! ```text
//! Coordinator::wait ──▶ Ok / Err ──▶ report (unless quiet)
//!                                   │
//!                policy.should_run? ├── no  ──▶ wait result
//!                                   └── yes ──▶ command's own result
//! ```
//!
//! When the command runs, its result replaces the wait result: with
//! `--on f` a timed-out wait followed by a successful command is a success.

use std::process::ExitStatus;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use tcpwait_core::{Coordinator, TcpProber, WaitError};

use crate::domain::WaitConfig;
use crate::infrastructure::command::{self, CommandError};

/// Every endpoint connected (or the command succeeded).
pub const EXIT_SUCCESS: u8 = 0;
/// The wait failed, or the command failed without an exit code.
pub const EXIT_FAILURE: u8 = 1;
/// Configuration was rejected before waiting (`EINVAL`).
pub const EXIT_INVALID_USAGE: u8 = 22;
/// The wait was interrupted with Ctrl+C.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Why a run did not succeed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The wait failed and the command did not run.
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// The command could not be started.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The command ran and exited unsuccessfully.
    #[error("command {program:?} failed: {status}")]
    CommandFailed { program: String, status: ExitStatus },
}

impl RunError {
    /// The process exit code for this failure.
    ///
    /// A failed command propagates its own exit code; everything else is a
    /// generic failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Wait(WaitError::Cancelled) => EXIT_INTERRUPTED,
            RunError::Wait(_) | RunError::Command(_) => EXIT_FAILURE,
            RunError::CommandFailed { status, .. } => {
                u8::try_from(command::exit_code(*status)).unwrap_or(EXIT_FAILURE)
            }
        }
    }
}

/// Waits for every endpoint in `config`, then applies the run policy.
///
/// `shutdown` aborts the wait early.  An interrupted wait never triggers
/// the command, whatever the policy.
///
/// # Errors
///
/// - [`RunError::Wait`] when the wait failed and the command did not run.
/// - [`RunError::Command`] when the command could not be spawned.
/// - [`RunError::CommandFailed`] when the command exited unsuccessfully.
pub async fn run(config: &WaitConfig, shutdown: &CancellationToken) -> Result<(), RunError> {
    let coordinator = Coordinator::new(TcpProber::new(config.connect_timeout), config.wait);
    let waited = coordinator
        .wait_until_cancelled(&config.endpoints, shutdown)
        .await;

    if let Err(err) = &waited {
        // `WaitError::DeadlineExceeded` displays as "timeout error".
        error!("{err}");
        if err.is_timeout() {
            debug!(timeout = ?config.wait.overall_timeout, "deadline reached before every endpoint connected");
        }
        if matches!(err, WaitError::Cancelled) {
            return waited.map_err(RunError::from);
        }
    }

    if config.command.is_empty() || !config.policy.should_run(waited.is_ok()) {
        debug!(policy = %config.policy, "post-check command skipped");
        return waited.map_err(RunError::from);
    }

    let status = command::execute(&config.command).await?;
    if status.success() {
        Ok(())
    } else {
        Err(RunError::CommandFailed {
            program: config.command.first().cloned().unwrap_or_default(),
            status,
        })
    }
}
