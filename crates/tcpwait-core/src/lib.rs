//! # tcpwait-core
//!
//! The connection-polling engine behind the `tcpwait` command-line tool.
//!
//! Given a set of TCP endpoints, the engine repeatedly attempts a connection to
//! each one (concurrently, one task per endpoint) until every endpoint accepts,
//! an endpoint turns out to be defective, or a shared deadline elapses.
//!
//! # Architecture overview
//!
//! ```text
//! Coordinator::wait(endpoints)
//!   ├── retry loop ── Probe::probe(addr) ── Connected   → done
//!   ├── retry loop ── Probe::probe(addr) ── Unreachable → tick, retry
//!   └── retry loop ── Probe::probe(addr) ── Invalid     → cancel everyone
//! ```
//!
//! - **`domain`** – Pure types: validated [`Endpoint`]s, host/port parsing,
//!   [`ProbeOutcome`] and the error taxonomy.
//! - **`probe`** – The [`Probe`] seam and its TCP implementation,
//!   [`TcpProber`].  One call is exactly one connect attempt.
//! - **`coordinator`** – The [`Coordinator`] that fans out one retry loop per
//!   endpoint and fans the results back in under a shared deadline.
//!
//! The crate holds no global state.  Every timeout and interval is passed in
//! explicitly at construction time.

pub mod coordinator;
pub mod domain;
pub mod probe;

// Re-export the most-used types at the crate root so callers can write
// `tcpwait_core::Coordinator` instead of `tcpwait_core::coordinator::Coordinator`.
pub use coordinator::{Coordinator, WaitError, WaitOptions};
pub use domain::address::{preferred_address, split_host_port, AddressError};
pub use domain::endpoint::Endpoint;
pub use domain::outcome::ProbeOutcome;
pub use probe::{Probe, TcpProber};

// The cancellation token type is part of the public `Probe` signature.
pub use tokio_util::sync::CancellationToken;
