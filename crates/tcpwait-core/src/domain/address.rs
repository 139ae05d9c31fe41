//! `host:port` parsing and name resolution.
//!
//! An address is *defective* when retrying it can never help: the text does
//! not follow the `host:port` grammar, the port is outside `0..=65535`, or the
//! host name does not resolve.  All of those surface as an [`AddressError`],
//! which the prober reports as a terminal outcome.
//!
//! # Grammar
//!
//! ```text
//! host:port        db.internal:5432, 127.0.0.1:80
//! [ipv6]:port      [::1]:8080
//! :port            shorthand for localhost:port
//! ```
//!
//! Ports must be numeric.  Service names (`host:http`) are rejected.

use std::net::SocketAddr;

use thiserror::Error;

/// Host substituted when the address omits one (`:8080`).
const DEFAULT_HOST: &str = "localhost";

/// Why an address can never be connected to.
#[derive(Debug, Error)]
pub enum AddressError {
    /// There is no `:` separating host and port.
    #[error("address {addr}: missing port in address")]
    MissingPort { addr: String },

    /// An IPv6 literal was written without brackets (`::1:80`).
    #[error("address {addr}: too many colons in address")]
    TooManyColons { addr: String },

    /// A `[` was opened but never closed, or was not followed by `:port`.
    #[error("address {addr}: malformed bracketed host")]
    MalformedBrackets { addr: String },

    /// The port is empty, non-numeric, or outside `0..=65535`.
    #[error("address {port}: invalid port")]
    InvalidPort { addr: String, port: String },

    /// The host name could not be resolved.
    #[error("lookup {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution succeeded but returned no addresses.
    #[error("lookup {host}: no addresses found")]
    NoAddresses { host: String },
}

/// Splits `raw` into its host and numeric port.
///
/// Brackets around an IPv6 host are removed.  An empty host is returned as
/// an empty string; [`resolve_all`] substitutes `localhost` for it.
///
/// # Errors
///
/// Returns an [`AddressError`] describing the first grammar violation.
///
/// # Example
///
/// ```rust
/// use tcpwait_core::split_host_port;
///
/// assert_eq!(split_host_port("db:5432").unwrap(), ("db", 5432));
/// assert_eq!(split_host_port("[::1]:80").unwrap(), ("::1", 80));
/// assert!(split_host_port("localhost:99999").is_err());
/// ```
pub fn split_host_port(raw: &str) -> Result<(&str, u16), AddressError> {
    let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| AddressError::MalformedBrackets { addr: raw.to_string() })?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| AddressError::MalformedBrackets { addr: raw.to_string() })?;
        (host, port)
    } else {
        let (host, port) = raw
            .rsplit_once(':')
            .ok_or_else(|| AddressError::MissingPort { addr: raw.to_string() })?;
        if host.contains(':') {
            return Err(AddressError::TooManyColons { addr: raw.to_string() });
        }
        (host, port)
    };

    let invalid_port = || AddressError::InvalidPort {
        addr: raw.to_string(),
        port: port.to_string(),
    };
    // `u16::from_str` accepts a leading '+', which is not valid in an address.
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_port());
    }
    let port: u16 = port.parse().map_err(|_| invalid_port())?;

    Ok((host, port))
}

/// Parses and resolves `raw` into every socket address it names, in the
/// order the resolver returned them.
///
/// # Errors
///
/// Returns a grammar error from [`split_host_port`], [`AddressError::Resolve`]
/// when the lookup fails, or [`AddressError::NoAddresses`] when it succeeds
/// with an empty answer.
pub async fn resolve_all(raw: &str) -> Result<Vec<SocketAddr>, AddressError> {
    let (host, port) = split_host_port(raw)?;
    let host = if host.is_empty() { DEFAULT_HOST } else { host };

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|source| AddressError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(AddressError::NoAddresses { host: host.to_string() });
    }
    Ok(addrs)
}

/// Picks the address an endpoint should pin from a resolver answer.
///
/// IPv4 is preferred unless the host was written as a bracketed IPv6 literal,
/// in which case the first IPv6 address is preferred.  Resolvers commonly
/// list `::1` before `127.0.0.1` for `localhost`, while most servers listen
/// on IPv4 only.  Falls back to the first address when the preferred family
/// is absent; returns `None` only for an empty answer.
pub fn preferred_address(addrs: &[SocketAddr], bracketed: bool) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv6() == bracketed)
        .or_else(|| addrs.first())
        .copied()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_host_and_port() {
        assert_eq!(split_host_port("localhost:1234").unwrap(), ("localhost", 1234));
    }

    #[test]
    fn test_split_bracketed_ipv6() {
        assert_eq!(split_host_port("[fe80::1]:443").unwrap(), ("fe80::1", 443));
    }

    #[test]
    fn test_split_empty_host_is_allowed() {
        assert_eq!(split_host_port(":8080").unwrap(), ("", 8080));
    }

    #[test]
    fn test_split_port_zero_and_max_are_valid() {
        assert_eq!(split_host_port("h:0").unwrap().1, 0);
        assert_eq!(split_host_port("h:65535").unwrap().1, 65535);
    }

    #[test]
    fn test_split_port_out_of_range_is_invalid_port() {
        // Arrange / Act
        let err = split_host_port("localhost:99999").unwrap_err();

        // Assert: the message names the offending port
        assert!(matches!(err, AddressError::InvalidPort { ref port, .. } if port == "99999"));
        assert_eq!(err.to_string(), "address 99999: invalid port");
    }

    #[test]
    fn test_split_non_numeric_port_is_invalid_port() {
        assert!(matches!(
            split_host_port("localhost:http"),
            Err(AddressError::InvalidPort { .. })
        ));
        assert!(matches!(
            split_host_port("localhost:+80"),
            Err(AddressError::InvalidPort { .. })
        ));
        assert!(matches!(
            split_host_port("localhost:"),
            Err(AddressError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_split_missing_port() {
        assert!(matches!(
            split_host_port("localhost"),
            Err(AddressError::MissingPort { .. })
        ));
    }

    #[test]
    fn test_split_unbracketed_ipv6_has_too_many_colons() {
        assert!(matches!(
            split_host_port("::1:80"),
            Err(AddressError::TooManyColons { .. })
        ));
    }

    #[test]
    fn test_split_unclosed_bracket_is_malformed() {
        assert!(matches!(
            split_host_port("[::1:80"),
            Err(AddressError::MalformedBrackets { .. })
        ));
        assert!(matches!(
            split_host_port("[::1]80"),
            Err(AddressError::MalformedBrackets { .. })
        ));
    }

    fn dual_stack_answer() -> Vec<SocketAddr> {
        // The order glibc returns for `localhost` with `::1` listed first in
        // /etc/hosts.
        vec![
            "[::1]:5432".parse().unwrap(),
            "127.0.0.1:5432".parse().unwrap(),
        ]
    }

    #[test]
    fn test_preferred_address_picks_ipv4_for_plain_host() {
        // Arrange
        let answer = dual_stack_answer();

        // Act
        let chosen = preferred_address(&answer, false);

        // Assert
        assert_eq!(chosen, Some("127.0.0.1:5432".parse().unwrap()));
    }

    #[test]
    fn test_preferred_address_picks_ipv6_for_bracketed_host() {
        let mut answer = dual_stack_answer();
        answer.reverse();

        assert_eq!(preferred_address(&answer, true), Some("[::1]:5432".parse().unwrap()));
    }

    #[test]
    fn test_preferred_address_falls_back_to_other_family() {
        let v6_only: Vec<SocketAddr> = vec!["[::1]:80".parse().unwrap()];
        let v4_only: Vec<SocketAddr> = vec!["127.0.0.1:80".parse().unwrap()];

        assert_eq!(preferred_address(&v6_only, false), Some(v6_only[0]));
        assert_eq!(preferred_address(&v4_only, true), Some(v4_only[0]));
        assert_eq!(preferred_address(&[], false), None);
    }

    #[tokio::test]
    async fn test_resolve_ip_literal_needs_no_dns() {
        let addrs = resolve_all("127.0.0.1:5000").await.unwrap();
        assert_eq!(addrs, vec!["127.0.0.1:5000".parse::<SocketAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn test_resolve_propagates_grammar_errors() {
        assert!(matches!(
            resolve_all("127.0.0.1:70000").await,
            Err(AddressError::InvalidPort { .. })
        ));
    }
}
