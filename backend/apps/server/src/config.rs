//! Server configuration from the environment

use anyhow::anyhow;
use platform::env::parse_or;
use pow::{PowConfig, TargetBits};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 10;

#[derive(Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Shared Redis ledger; the in-process store is used when absent
    pub redis_url: Option<String>,
    pub pow: PowConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let redis_url = lookup("REDIS_URL").filter(|url| !url.is_empty());

        let lifetime_secs: u64 = parse_or(
            &lookup,
            "AUTH_TOKEN_LIFETIME_SECS",
            DEFAULT_TOKEN_LIFETIME_SECS,
        )?;
        if lifetime_secs == 0 {
            return Err(anyhow!("AUTH_TOKEN_LIFETIME_SECS must be at least 1"));
        }
        let lifetime = Duration::from_secs(lifetime_secs);
        let bits: u64 = parse_or(
            &lookup,
            "AUTH_TOKEN_TARGET_BITS",
            u64::from(TargetBits::DEFAULT),
        )?;
        let target_bits = TargetBits::new(bits).ok_or_else(|| {
            anyhow!(
                "AUTH_TOKEN_TARGET_BITS must be in {}..={}, got {bits}",
                TargetBits::MIN,
                TargetBits::MAX
            )
        })?;

        let base = match lookup("JWT_HS256_KEY").filter(|key| !key.is_empty()) {
            Some(key) => PowConfig {
                token_secret: key.into_bytes(),
                ..PowConfig::default()
            },
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_HS256_KEY not set, using a random key for this process");
                PowConfig::with_random_secret()
            }
            None => return Err(anyhow!("JWT_HS256_KEY must be set in production")),
        };

        Ok(Self {
            port,
            redis_url,
            pow: PowConfig {
                target_bits,
                challenge_ttl: lifetime,
                access_ttl: lifetime,
                ledger_retention: lifetime,
                ..base
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("JWT_HS256_KEY", "key")]).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.pow.target_bits, TargetBits::DEFAULT);
        assert_eq!(config.pow.challenge_ttl, Duration::from_secs(10));
        assert_eq!(config.pow.access_ttl, Duration::from_secs(10));
        assert_eq!(config.pow.ledger_retention, Duration::from_secs(10));
        assert_eq!(config.pow.token_secret, b"key".to_vec());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("REDIS_URL", "redis://cache:6379"),
            ("AUTH_TOKEN_LIFETIME_SECS", "30"),
            ("AUTH_TOKEN_TARGET_BITS", "20"),
            ("JWT_HS256_KEY", "key"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.pow.target_bits, TargetBits::new(20).unwrap());
        assert_eq!(config.pow.access_ttl, Duration::from_secs(30));
        assert!(!config.pow.retention_shorter_than_tokens());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("PORT", "eighty"), ("JWT_HS256_KEY", "key")]).is_err());
        assert!(config(&[("AUTH_TOKEN_TARGET_BITS", "0"), ("JWT_HS256_KEY", "key")]).is_err());
        assert!(config(&[("AUTH_TOKEN_TARGET_BITS", "256"), ("JWT_HS256_KEY", "key")]).is_err());
        assert!(config(&[("AUTH_TOKEN_LIFETIME_SECS", "0"), ("JWT_HS256_KEY", "key")]).is_err());
        assert!(config(&[("AUTH_TOKEN_LIFETIME_SECS", "-5"), ("JWT_HS256_KEY", "key")]).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_missing_key_uses_random_secret_in_debug() {
        let first = config(&[]).unwrap();
        let second = config(&[]).unwrap();
        assert_eq!(first.pow.token_secret.len(), 32);
        assert_ne!(first.pow.token_secret, second.pow.token_secret);
    }
}
