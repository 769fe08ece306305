//! Client configuration from the environment

use platform::env::parse_or;
use std::time::Duration;

const DEFAULT_SERVER_HOST: &str = "http://localhost:8081";
const DEFAULT_POW_DEADLINE_SECS: u64 = 30;
const DEFAULT_QUOTE_INTERVAL_MS: u64 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_host: String,
    /// Upper bound on one proof-of-work search
    pub pow_deadline: Duration,
    pub quote_interval: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let server_host = lookup("SERVER_HOST")
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let pow_deadline_secs: u64 =
            parse_or(&lookup, "POW_DEADLINE_SECS", DEFAULT_POW_DEADLINE_SECS)?;
        let quote_interval_ms: u64 =
            parse_or(&lookup, "QUOTE_INTERVAL_MS", DEFAULT_QUOTE_INTERVAL_MS)?;

        Ok(Self {
            server_host,
            pow_deadline: Duration::from_secs(pow_deadline_secs),
            // Zero would panic in tokio::time::interval
            quote_interval: Duration::from_millis(quote_interval_ms.max(1)),
            request_timeout: REQUEST_TIMEOUT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.server_host, "http://localhost:8081");
        assert_eq!(config.pow_deadline, Duration::from_secs(30));
        assert_eq!(config.quote_interval, Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides_and_errors() {
        let config = ClientConfig::from_lookup(|name| match name {
            "SERVER_HOST" => Some("http://quotes:9000".to_string()),
            "POW_DEADLINE_SECS" => Some("5".to_string()),
            "QUOTE_INTERVAL_MS" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.server_host, "http://quotes:9000");
        assert_eq!(config.pow_deadline, Duration::from_secs(5));
        assert_eq!(config.quote_interval, Duration::from_millis(1));

        let err = ClientConfig::from_lookup(|name| {
            (name == "POW_DEADLINE_SECS").then(|| "soon".to_string())
        });
        assert!(err.is_err());
    }
}
