//! The validated [`Endpoint`] value.

use std::fmt;

use super::address::{preferred_address, resolve_all, AddressError};

/// A TCP endpoint that passed configuration-time validation.
///
/// Construct one with [`Endpoint::resolve`], which checks the `host:port`
/// grammar and resolves the host.  The endpoint stores the canonical text of
/// one resolved socket address (`127.0.0.1:5432`, `[::1]:80`), so later
/// probes dial exactly what was validated.  IPv4 is chosen unless the host
/// is a bracketed IPv6 literal.
///
/// Endpoints are immutable.  Duplicates are allowed; each one is probed
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: String,
}

impl Endpoint {
    /// Validates `raw` and resolves it to a canonical address.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the text is malformed, the port is out of
    /// range, or the host does not resolve.
    ///
    /// # Example
    ///
    /// ```rust
    /// # tokio_test::block_on(async {
    /// use tcpwait_core::Endpoint;
    ///
    /// let ep = Endpoint::resolve("127.0.0.1:8080").await.unwrap();
    /// assert_eq!(ep.as_str(), "127.0.0.1:8080");
    /// # });
    /// ```
    pub async fn resolve(raw: &str) -> Result<Self, AddressError> {
        let answer = resolve_all(raw).await?;
        let chosen = preferred_address(&answer, raw.starts_with('['))
            .ok_or_else(|| AddressError::NoAddresses { host: raw.to_string() })?;
        Ok(Self {
            addr: chosen.to_string(),
        })
    }

    /// Returns the canonical `ip:port` text.
    pub fn as_str(&self) -> &str {
        &self.addr
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.addr
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}
