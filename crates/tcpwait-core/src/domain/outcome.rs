//! The result of a single probe attempt.

use std::fmt;

use super::address::AddressError;

/// Classification of one connect attempt.
///
/// Produced fresh by every [`crate::Probe::probe`] call and never stored.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The TCP handshake completed; the connection was closed straight away.
    Connected,
    /// The connect failed for a reason that may go away (refused, timed out,
    /// host down, cancelled).  Worth retrying.
    Unreachable,
    /// The address itself is defective.  Retrying cannot help.
    Invalid(AddressError),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Connected => f.write_str("connected"),
            ProbeOutcome::Unreachable => f.write_str("unreachable"),
            ProbeOutcome::Invalid(err) => write!(f, "invalid: {err}"),
        }
    }
}
