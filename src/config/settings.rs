//! Runtime settings read from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/explorer";

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// PostgreSQL schema whose tables are exposed.
    pub schema: String,
    pub max_connections: u32,
    pub pagination: Pagination,
    pub body_limit: usize,
}

/// Page size bounds for row listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            default_limit: 5,
            max_limit: 1000,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Pagination::default();
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let schema = lookup("DB_SCHEMA").unwrap_or_else(|| "public".into());
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let default_limit = parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_limit)?;
        let max_limit = parse_or(&lookup, "MAX_PAGE_SIZE", defaults.max_limit)?;
        let body_limit = parse_or(&lookup, "BODY_LIMIT_BYTES", 1024 * 1024usize)?;

        if schema.trim().is_empty() {
            return Err(ConfigError::Validation("DB_SCHEMA must not be empty".into()));
        }
        if max_connections == 0 {
            return Err(ConfigError::Validation("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        if max_limit == 0 || default_limit > max_limit {
            return Err(ConfigError::Validation(format!(
                "page sizes out of range: default {} max {}",
                default_limit, max_limit
            )));
        }

        Ok(Settings {
            database_url,
            bind_addr,
            schema,
            max_connections,
            pagination: Pagination {
                default_limit,
                max_limit,
            },
            body_limit,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
