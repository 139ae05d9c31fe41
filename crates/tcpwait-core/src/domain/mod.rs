//! Domain types for tcpwait.
//!
//! Everything here is plain data plus the rules for validating it.  The only
//! I/O is name resolution in [`endpoint::Endpoint::resolve`] and
//! [`address::resolve_all`], which is part of deciding whether an address is
//! valid at all.
//!
//! # What belongs in the domain layer?
//!
//! - The `host:port` grammar and its error type
//! - The validated [`endpoint::Endpoint`] value
//! - The per-attempt [`outcome::ProbeOutcome`]
//!
//! # What does NOT belong here?
//!
//! - Opening sockets (that is [`crate::probe`])
//! - Spawning tasks or timers (that is [`crate::coordinator`])

pub mod address;
pub mod endpoint;
pub mod outcome;
