//! Multi-endpoint coordination.
//!
//! [`Coordinator::wait`] starts one retry loop per endpoint.  All loops share
//! one [`CancellationToken`]:
//!
//! ```text
//!            ┌────────── CancellationToken ──────────┐
//!            │                                       │
//!   loop(a) ─┤ probe → Unreachable → tick → probe …  │
//!   loop(b) ─┤ probe → Connected                     ├─ join all → Result
//!   loop(c) ─┤ probe → Invalid → cancel() ───────────┘
//!            │
//!   deadline ┘ (optional) → cancel()
//! ```
//!
//! The first terminal event (an invalid address or the deadline) cancels the
//! token; every other loop stops at its next suspension point.  The
//! coordinator still joins every loop before returning, so no task outlives
//! the call.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::address::AddressError;
use crate::domain::outcome::ProbeOutcome;
use crate::probe::Probe;

mod session;

use session::WaitSession;

/// Default pause between two attempts on the same endpoint.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Why a wait operation failed.
#[derive(Debug, Error)]
pub enum WaitError {
    /// `wait` was called with an empty endpoint list.
    #[error("no endpoints provided")]
    NoEndpoints,

    /// The retry interval was zero, which would spin without pausing.
    #[error("retry interval must be greater than zero")]
    ZeroInterval,

    /// The shared deadline elapsed before every endpoint connected.
    #[error("timeout error")]
    DeadlineExceeded,

    /// One endpoint's address is defective.  Reported verbatim.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    /// The wait was cancelled from outside (for example by Ctrl+C).
    #[error("wait cancelled")]
    Cancelled,

    /// A retry loop panicked.
    #[error("endpoint task failed: {0}")]
    Task(#[from] JoinError),
}

impl WaitError {
    /// Returns `true` when the shared deadline caused the failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::DeadlineExceeded)
    }
}

/// Timing knobs for one wait operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Pause between attempts on the same endpoint.  Must be non-zero.
    pub retry_interval: Duration,
    /// Shared deadline across all endpoints.  `Duration::ZERO` means wait
    /// forever.
    pub overall_timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_RETRY_INTERVAL,
            overall_timeout: Duration::ZERO,
        }
    }
}

/// Waits for a set of endpoints to become reachable.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tcpwait_core::{Coordinator, TcpProber, WaitOptions};
///
/// # async fn example() -> Result<(), tcpwait_core::WaitError> {
/// let coordinator = Coordinator::new(
///     TcpProber::new(Duration::from_secs(2)),
///     WaitOptions {
///         retry_interval: Duration::from_millis(500),
///         overall_timeout: Duration::from_secs(30),
///     },
/// );
/// coordinator.wait(&["127.0.0.1:5432", "127.0.0.1:6379"]).await?;
/// # Ok(())
/// # }
/// ```
pub struct Coordinator<P> {
    prober: Arc<P>,
    options: WaitOptions,
}

impl<P: Probe + 'static> Coordinator<P> {
    /// Creates a coordinator that probes with `prober`.
    pub fn new(prober: P, options: WaitOptions) -> Self {
        Self::with_shared_prober(Arc::new(prober), options)
    }

    /// Creates a coordinator around a prober the caller keeps a handle to.
    pub fn with_shared_prober(prober: Arc<P>, options: WaitOptions) -> Self {
        Self { prober, options }
    }

    /// Waits until every endpoint connects.
    ///
    /// # Errors
    ///
    /// - [`WaitError::NoEndpoints`] / [`WaitError::ZeroInterval`] before
    ///   anything is probed.
    /// - [`WaitError::InvalidAddress`] as soon as one endpoint is defective.
    /// - [`WaitError::DeadlineExceeded`] when the overall timeout elapses.
    pub async fn wait<A: AsRef<str>>(&self, endpoints: &[A]) -> Result<(), WaitError> {
        self.wait_until_cancelled(endpoints, &CancellationToken::new())
            .await
    }

    /// Like [`Coordinator::wait`], but also stops when `shutdown` fires.
    ///
    /// The loops run under a child of `shutdown`, so cancelling the session
    /// internally never cancels the caller's token.
    ///
    /// # Errors
    ///
    /// As [`Coordinator::wait`], plus [`WaitError::Cancelled`] when
    /// `shutdown` fires first.
    pub async fn wait_until_cancelled<A: AsRef<str>>(
        &self,
        endpoints: &[A],
        shutdown: &CancellationToken,
    ) -> Result<(), WaitError> {
        if endpoints.is_empty() {
            return Err(WaitError::NoEndpoints);
        }
        if self.options.retry_interval.is_zero() {
            return Err(WaitError::ZeroInterval);
        }

        let session = WaitSession::start(&self.options, shutdown.child_token(), endpoints.len());
        let mut loops = JoinSet::new();
        for addr in endpoints {
            loops.spawn(retry_loop(
                Arc::clone(&self.prober),
                session.token(),
                self.options.retry_interval,
                addr.as_ref().to_owned(),
            ));
        }

        session.join(loops).await
    }
}

/// Probes one endpoint until it connects, turns out invalid, or the shared
/// token is cancelled.
async fn retry_loop<P: Probe + ?Sized>(
    prober: Arc<P>,
    cancel: CancellationToken,
    interval: Duration,
    addr: String,
) -> Result<(), WaitError> {
    // The first tick is due one interval from now, not immediately.
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!("connecting to {addr}...");
    loop {
        match prober.probe(&cancel, &addr).await {
            ProbeOutcome::Connected => {
                info!("successfully connected to {addr}");
                return Ok(());
            }
            ProbeOutcome::Invalid(err) => {
                cancel.cancel();
                return Err(WaitError::InvalidAddress(err));
            }
            ProbeOutcome::Unreachable => {}
        }

        tokio::select! {
            _ = ticker.tick() => {}
            () = cancel.cancelled() => return Err(WaitError::Cancelled),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
