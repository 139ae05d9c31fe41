//! Single-endpoint probing.
//!
//! A probe is one connect-and-immediately-disconnect attempt.  Retry policy
//! does not live here; see [`crate::coordinator`].
//!
//! The [`Probe`] trait is the seam between the coordinator and the network.
//! [`TcpProber`] dials real sockets; tests substitute scripted doubles.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::outcome::ProbeOutcome;

pub mod tcp;

pub use tcp::TcpProber;

/// Makes exactly one reachability attempt against one address.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Attempts one connection to `addr` and classifies the result.
    ///
    /// Implementations must return promptly once `cancel` fires.  A
    /// cancelled attempt is reported as [`ProbeOutcome::Unreachable`]; the
    /// caller observes the cancellation itself.
    async fn probe(&self, cancel: &CancellationToken, addr: &str) -> ProbeOutcome;
}
