//! Runtime configuration loaded from the environment.
//!
//! Variables (a `.env` file is honored in development):
//!
//! | Variable                    | Required | Default   |
//! |-----------------------------|----------|-----------|
//! | `DATABASE_URL`              | yes      |           |
//! | `SHOPIFY_API_KEY`           | yes      |           |
//! | `SHOPIFY_API_SECRET`        | yes      |           |
//! | `HOST`                      | no       | `0.0.0.0` |
//! | `PORT`                      | no       | `8080`    |
//! | `DATABASE_MAX_CONNECTIONS`  | no       | `5`       |
//! | `RULE_CACHE_TTL_SECS`       | no       | `60`      |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub shopify_api_key: String,
    pub shopify_api_secret: String,
    pub rule_cache_ttl: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let ttl_secs: u64 = parse_or(&lookup, "RULE_CACHE_TTL_SECS", 60)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            shopify_api_key: required("SHOPIFY_API_KEY")?,
            shopify_api_secret: required("SHOPIFY_API_SECRET")?,
            rule_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(key.to_string(), raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/b2b"),
        ("SHOPIFY_API_KEY", "key"),
        ("SHOPIFY_API_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.rule_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_secret_is_error() {
        let result = Config::from_lookup(lookup_from(&REQUIRED[..2]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "SHOPIFY_API_SECRET"));
    }

    #[test]
    fn test_blank_required_value_is_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("SHOPIFY_API_KEY", "  ");
        let result = Config::from_lookup(lookup_from(&pairs));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let result = Config::from_lookup(lookup_from(&pairs));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "PORT"));
    }

    #[test]
    fn test_overrides_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("PORT", "3000"), ("RULE_CACHE_TTL_SECS", "5"), ("HOST", "127.0.0.1")]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.rule_cache_ttl, Duration::from_secs(5));
    }
}
