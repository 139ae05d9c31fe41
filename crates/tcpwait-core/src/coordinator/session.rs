//! Per-call state of one wait operation.

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{WaitError, WaitOptions};

/// Lives for exactly one [`super::Coordinator::wait_until_cancelled`] call.
pub(super) struct WaitSession {
    /// Absolute deadline, or `None` when the overall timeout is zero.
    deadline: Option<Instant>,
    /// Shared by every retry loop of this session.
    cancel: CancellationToken,
    /// Number of endpoints in the session.
    expected: usize,
    /// Loops that finished with `Connected`.
    connected: usize,
    /// The error that will be surfaced, if any.
    first_error: Option<WaitError>,
}

impl WaitSession {
    pub(super) fn start(options: &WaitOptions, cancel: CancellationToken, expected: usize) -> Self {
        let deadline = if options.overall_timeout.is_zero() {
            None
        } else {
            Some(Instant::now() + options.overall_timeout)
        };
        Self {
            deadline,
            cancel,
            expected,
            connected: 0,
            first_error: None,
        }
    }

    /// A handle to the session's cancellation token for one retry loop.
    pub(super) fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for every loop to finish, racing the shared deadline.
    ///
    /// Returns `Ok(())` only if every loop connected.
    pub(super) async fn join(
        mut self,
        mut loops: JoinSet<Result<(), WaitError>>,
    ) -> Result<(), WaitError> {
        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(expired);
        let mut deadline_armed = true;

        loop {
            tokio::select! {
                joined = loops.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok(()))) => self.connected += 1,
                    Some(Ok(Err(err))) => self.record(err),
                    Some(Err(join_err)) => self.record(WaitError::Task(join_err)),
                },
                () = &mut expired, if deadline_armed => {
                    deadline_armed = false;
                    debug!(
                        connected = self.connected,
                        expected = self.expected,
                        "shared deadline elapsed"
                    );
                    self.record(WaitError::DeadlineExceeded);
                }
            }
        }

        match self.first_error {
            Some(err) => Err(err),
            None => {
                debug!(connected = self.connected, "all endpoints connected");
                Ok(())
            }
        }
    }

    /// Cancels the session and keeps the first meaningful error.
    ///
    /// `Cancelled` only wins when nothing else explains the failure: a loop
    /// that stopped because a sibling failed must not mask that sibling's
    /// error.
    fn record(&mut self, err: WaitError) {
        self.cancel.cancel();
        let replace = match &self.first_error {
            None => true,
            Some(WaitError::Cancelled) => !matches!(err, WaitError::Cancelled),
            Some(_) => false,
        };
        if replace {
            self.first_error = Some(err);
        }
    }
}
