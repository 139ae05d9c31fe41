//! TCP implementation of the [`Probe`] seam.
//!
//! # How one attempt works
//!
//! 1. The address is parsed and resolved.  Any failure here means the address
//!    is defective, so the outcome is [`ProbeOutcome::Invalid`].
//! 2. Each resolved socket address is dialled in turn, the way a dialer falls
//!    back from IPv6 to IPv4.  The first handshake that completes wins.  The
//!    connect timeout bounds the whole chain, not each target.
//! 3. The stream is dropped immediately.  Dropping a `TcpStream` closes the
//!    socket, so nothing carries over into the next attempt.
//!
//! The whole attempt races the caller's [`CancellationToken`].  When the
//! token fires mid-dial the pending connect future is dropped, which aborts
//! the connect.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Probe;
use crate::domain::address::resolve_all;
use crate::domain::outcome::ProbeOutcome;

/// Dials real TCP sockets.
#[derive(Debug, Clone, Default)]
pub struct TcpProber {
    /// Upper bound for a single connect attempt, covering every resolved
    /// address the attempt falls back through.
    ///
    /// `Duration::ZERO` disables the per-attempt bound; the attempt is then
    /// limited only by cancellation and the operating system's own connect
    /// timeout.
    connect_timeout: Duration,
}

impl TcpProber {
    /// Creates a prober with the given per-attempt connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn dial(&self, addr: &str) -> ProbeOutcome {
        let targets = match resolve_all(addr).await {
            Ok(targets) => targets,
            Err(err) => return ProbeOutcome::Invalid(err),
        };
        self.bounded(addr, first_connected(addr, &targets, TcpStream::connect))
            .await
    }

    /// Runs `attempt` under the connect timeout, if one is set.
    async fn bounded<F>(&self, addr: &str, attempt: F) -> ProbeOutcome
    where
        F: Future<Output = ProbeOutcome>,
    {
        if self.connect_timeout.is_zero() {
            return attempt.await;
        }
        match tokio::time::timeout(self.connect_timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => {
                debug!("dial tcp {addr}: i/o timeout after {:?}", self.connect_timeout);
                ProbeOutcome::Unreachable
            }
        }
    }
}

/// Dials each target in turn until one handshake completes.
async fn first_connected<C, Fut>(addr: &str, targets: &[SocketAddr], connect: C) -> ProbeOutcome
where
    C: Fn(SocketAddr) -> Fut,
    Fut: Future<Output = io::Result<TcpStream>>,
{
    for &target in targets {
        match connect(target).await {
            Ok(stream) => {
                // Pure reachability check: close without exchanging data.
                drop(stream);
                return ProbeOutcome::Connected;
            }
            Err(e) => debug!("dial tcp {addr} ({target}): {e}"),
        }
    }
    ProbeOutcome::Unreachable
}

#[async_trait]
impl Probe for TcpProber {
    async fn probe(&self, cancel: &CancellationToken, addr: &str) -> ProbeOutcome {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => ProbeOutcome::Unreachable,
            outcome = self.dial(addr) => outcome,
        };
        debug!(addr, %outcome, "probe finished");
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
