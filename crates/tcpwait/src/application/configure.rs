//! Validation and resolution of user settings.

use tracing::{debug, warn};

use tcpwait_core::Endpoint;

use crate::domain::{ConfigError, Settings, WaitConfig};

/// Checks `settings`, resolves every endpoint and applies the defaults.
///
/// Resolution happens here, once, so a name that does not resolve is a
/// configuration error rather than a failure discovered mid-wait.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found: a missing endpoint list, an
/// unknown policy token, a zero interval, or an endpoint that does not
/// parse or resolve.
pub async fn build_config(settings: Settings) -> Result<WaitConfig, ConfigError> {
    let policy = settings.check()?;

    let mut endpoints = Vec::with_capacity(settings.addresses.len());
    for raw in &settings.addresses {
        let endpoint = Endpoint::resolve(raw).await?;
        debug!("endpoint {raw} resolved to {endpoint}");
        endpoints.push(endpoint);
    }

    let config = WaitConfig::from_settings(settings, policy, endpoints);
    if config.dial_is_unbounded() {
        warn!(
            "neither a timeout nor a connect timeout is set; \
             a silently dropped connection attempt is bounded only by the OS"
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunPolicy;
    use std::time::Duration;

    #[tokio::test]
    async fn test_build_config_resolves_endpoints_in_order() {
        // Arrange
        let settings = Settings {
            addresses: vec!["127.0.0.1:2000".to_string(), "[::1]:3000".to_string()],
            timeout: Some(Duration::from_secs(2)),
            on: Some("any".to_string()),
            ..Default::default()
        };

        // Act
        let cfg = build_config(settings).await.unwrap();

        // Assert
        let endpoints: Vec<&str> = cfg.endpoints.iter().map(Endpoint::as_str).collect();
        assert_eq!(endpoints, vec!["127.0.0.1:2000", "[::1]:3000"]);
        assert_eq!(cfg.policy, RunPolicy::Always);
        assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_build_config_rejects_out_of_range_port() {
        let settings = Settings {
            addresses: vec!["localhost:99999".to_string()],
            ..Default::default()
        };

        let result = build_config(settings).await;

        assert!(matches!(result, Err(ConfigError::Address(_))));
    }

    #[tokio::test]
    async fn test_build_config_checks_policy_before_resolving() {
        // The bad address is never looked at because the policy is rejected first.
        let settings = Settings {
            addresses: vec!["localhost:99999".to_string()],
            on: Some("never".to_string()),
            ..Default::default()
        };

        let result = build_config(settings).await;

        assert!(matches!(result, Err(ConfigError::UnknownPolicy(_))));
    }

    #[tokio::test]
    async fn test_build_config_keeps_duplicates() {
        let settings = Settings {
            addresses: vec!["127.0.0.1:1".to_string(), "127.0.0.1:1".to_string()],
            ..Default::default()
        };
        let cfg = build_config(settings).await.unwrap();
        assert_eq!(cfg.endpoints.len(), 2);
    }
}
