//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use quill_infra::auth::{DEFAULT_ISSUER, DEFAULT_SECRET, JwtConfig};
use quill_infra::database::DatabaseConfig;
use quill_infra::rate_limit::RateLimitConfig;

use crate::telemetry::TelemetryConfig;

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Listing sizes.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub posts_per_page: u64,
    pub related_posts_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            related_posts_limit: 5,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let mut database = DatabaseConfig::new(url);
        database.max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 100)?;
        database.min_connections = parse_or(&lookup, "DB_MIN_CONNECTIONS", 10)?;
        database.auto_create_schema = flag(&lookup, "DB_AUTO_CREATE_SCHEMA", false);

        let pagination = PaginationConfig {
            posts_per_page: parse_or(&lookup, "POSTS_PER_PAGE", 10)?,
            related_posts_limit: parse_or(&lookup, "RELATED_POSTS_LIMIT", 5)?,
        };

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            ..JwtConfig::default()
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100)?,
            window: Duration::from_secs(parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 60)?),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            database,
            pagination,
            jwt,
            rate_limit,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Warn loudly when the shipped JWT secret is still in use.
    pub fn warn_on_default_secret(&self, production: bool) {
        if self.jwt.secret != DEFAULT_SECRET {
            return;
        }

        if production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database.max_connections, 100);
        assert!(!config.database.auto_create_schema);
        assert_eq!(config.pagination.posts_per_page, 10);
        assert_eq!(config.pagination.related_posts_limit, 5);
        assert_eq!(config.jwt.issuer, DEFAULT_ISSUER);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/quill"),
            ("PORT", "9000"),
            ("DB_AUTO_CREATE_SCHEMA", "true"),
            ("POSTS_PER_PAGE", "25"),
            ("JWT_SECRET", "s3cret"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert!(config.database.auto_create_schema);
        assert_eq!(config.pagination.posts_per_page, 25);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
