//! The post-check subprocess.
//!
//! The command inherits stdin, stdout and stderr, so its output appears as
//! if the user had run it directly.

use std::io;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Reported when a process has neither an exit code nor a signal.
const UNKNOWN_EXIT_CODE: i32 = 1;

/// Why the command could not be run.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command line was empty.
    #[error("no command given")]
    Empty,

    /// The program could not be started (not found, not executable, ...).
    #[error("failed to execute {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs `command[0]` with `command[1..]` as arguments and waits for it.
///
/// # Errors
///
/// Returns [`CommandError::Empty`] for an empty slice and
/// [`CommandError::Spawn`] when the process cannot be started.  A process
/// that starts and exits non-zero is *not* an error here; inspect the
/// returned [`ExitStatus`].
pub async fn execute(command: &[String]) -> Result<ExitStatus, CommandError> {
    let (program, args) = command.split_first().ok_or(CommandError::Empty)?;
    debug!("executing {program} {args:?}");

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

    debug!("{program} finished: {status}");
    Ok(status)
}

/// Converts an exit status into a shell-style exit code.
///
/// A normal exit yields its code.  On Unix a process killed by signal `N`
/// yields `128 + N`, matching what shells report.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}
