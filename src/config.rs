use crate::error::{AppError, Result};

pub const DATABASE_URL: &str = "sqlite:match-stats.db";

/// Default pool bounds.
pub const DB_POOL_MIN: u32 = 1;
pub const DB_POOL_MAX: u32 = 10;

pub const API_PORT: u16 = 3000;

/// Request body cap. Mismatch payloads are stored whole, so keep it generous.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Capacity of the chunk channel feeding a streamed response body.
/// Bounds how far the database cursor can run ahead of the client.
pub const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Basic-auth credentials parsed from `AUTH_CREDENTIALS` (`user:password`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn parse(raw: &str) -> Result<Self> {
        let (username, password) = raw.split_once(':').ok_or_else(|| {
            AppError::Config("AUTH_CREDENTIALS must look like user:password".to_string())
        })?;
        if username.is_empty() {
            return Err(AppError::Config(
                "AUTH_CREDENTIALS username must not be empty".to_string(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Minimum pooled connections (DB_POOL_MIN)
    pub pool_min: u32,
    /// Maximum pooled connections (DB_POOL_MAX); lease blocks once reached
    pub pool_max: u32,
    pub api_port: u16,
    /// Largest accepted request body in bytes (MAX_BODY_BYTES)
    pub max_body_bytes: usize,
    pub log_level: String,
    /// When set, every route sits behind HTTP basic auth (AUTH_CREDENTIALS)
    pub auth: Option<Credentials>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pool_min = match lookup("DB_POOL_MIN") {
            Some(v) => v
                .parse::<u32>()
                .map_err(|_| AppError::Config("DB_POOL_MIN must be a non-negative integer".to_string()))?,
            None => DB_POOL_MIN,
        };
        let pool_max = match lookup("DB_POOL_MAX") {
            Some(v) => v
                .parse::<u32>()
                .map_err(|_| AppError::Config("DB_POOL_MAX must be a positive integer".to_string()))?,
            None => DB_POOL_MAX,
        };
        if pool_max == 0 || pool_min > pool_max {
            return Err(AppError::Config(format!(
                "pool bounds are invalid: min={pool_min} max={pool_max}"
            )));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DATABASE_URL.to_string()),
            pool_min,
            pool_max,
            api_port: lookup("API_PORT")
                .unwrap_or_else(|| API_PORT.to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            max_body_bytes: match lookup("MAX_BODY_BYTES") {
                Some(v) => v.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                    AppError::Config("MAX_BODY_BYTES must be a positive integer".to_string())
                })?,
                None => MAX_BODY_BYTES,
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            auth: lookup("AUTH_CREDENTIALS")
                .filter(|v| !v.is_empty())
                .map(|v| Credentials::parse(&v))
                .transpose()?,
        })
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

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.database_url, DATABASE_URL);
        assert_eq!(cfg.pool_min, 1);
        assert_eq!(cfg.pool_max, 10);
        assert_eq!(cfg.api_port, 3000);
        assert_eq!(cfg.max_body_bytes, MAX_BODY_BYTES);
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn auth_credentials_split_on_first_colon() {
        let cfg = Config::from_lookup(lookup_from(&[("AUTH_CREDENTIALS", "stats:pa:ss")])).unwrap();
        assert_eq!(
            cfg.auth,
            Some(Credentials {
                username: "stats".to_string(),
                password: "pa:ss".to_string(),
            })
        );
    }

    #[test]
    fn empty_auth_credentials_disable_auth() {
        let cfg = Config::from_lookup(lookup_from(&[("AUTH_CREDENTIALS", "")])).unwrap();
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn auth_credentials_without_colon_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("AUTH_CREDENTIALS", "nocolon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn pool_min_above_max_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DB_POOL_MIN", "5"), ("DB_POOL_MAX", "2")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn body_limit_must_be_positive() {
        let cfg = Config::from_lookup(lookup_from(&[("MAX_BODY_BYTES", "1024")])).unwrap();
        assert_eq!(cfg.max_body_bytes, 1024);
        let err = Config::from_lookup(lookup_from(&[("MAX_BODY_BYTES", "0")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("API_PORT", "http")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
