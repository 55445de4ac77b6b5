//! Runtime settings read from the environment.

use crate::error::{ConfigError, ErrorExposure};
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/goats";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Which gateway backs the goat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub listen_addr: String,
    pub max_connections: u32,
    pub store: StoreKind,
    /// Postgres only: truncate the table and insert the fixture goats on startup.
    pub seed: bool,
    pub error_exposure: ErrorExposure,
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            store: StoreKind::Postgres,
            seed: false,
            error_exposure: ErrorExposure::Raw,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Settings {
    /// DATABASE_URL, LISTEN_ADDR, DB_MAX_CONNECTIONS, GOAT_STORE, GOAT_SEED,
    /// EXPOSE_DB_ERRORS, BODY_LIMIT_BYTES. Unset variables take their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let expose: bool = parsed(&lookup, "EXPOSE_DB_ERRORS", parse_bool)?.unwrap_or(true);
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", |s| s.parse().ok())?
                .unwrap_or(defaults.max_connections),
            store: parsed(&lookup, "GOAT_STORE", |s| s.parse().ok())?.unwrap_or(defaults.store),
            seed: parsed(&lookup, "GOAT_SEED", parse_bool)?.unwrap_or(defaults.seed),
            error_exposure: if expose {
                ErrorExposure::Raw
            } else {
                ErrorExposure::Redacted
            },
            body_limit: parsed(&lookup, "BODY_LIMIT_BYTES", |s| s.parse().ok())?
                .unwrap_or(defaults.body_limit),
        })
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse(raw.trim())
            .map(Some)
            .ok_or(ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
