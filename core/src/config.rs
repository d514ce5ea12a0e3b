//! Client configuration.
//!
//! Callers load this from wherever they keep credentials (file, env, vault)
//! and hand it to `NetcupClient::from_config`.

use std::time::Duration;

use serde::Deserialize;

/// Production CCP endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub customer_number: u64,
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whole-call timeout for each request. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl ClientConfig {
    pub fn new(customer_number: u64, api_key: &str) -> Self {
        Self {
            customer_number,
            api_key: api_key.to_string(),
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_to_production() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"customer_number":1234,"api_key":"key"}"#).unwrap();
        assert_eq!(config, ClientConfig::new(1234, "key"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn explicit_endpoint_and_timeout() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"customer_number":1,"api_key":"k","endpoint":"http://127.0.0.1:3000/","timeout_secs":5}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:3000/");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let result: Result<ClientConfig, _> = serde_json::from_str(r#"{"customer_number":1}"#);
        assert!(result.is_err());
    }
}
