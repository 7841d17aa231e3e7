use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be set when STORE_BACKEND=postgres")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Upper bound on a single store read made by the recommendation engine.
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_or("BIND_ADDR", &lookup, || {
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
        })?;
        let store_backend = parse_or("STORE_BACKEND", &lookup, || StoreBackend::Memory)?;
        let database_max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", &lookup, || DEFAULT_MAX_CONNECTIONS)?;
        let store_timeout_ms = parse_or("STORE_TIMEOUT_MS", &lookup, || DEFAULT_STORE_TIMEOUT_MS)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            bind_addr,
            store_backend,
            database_url,
            database_max_connections,
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default()),
    }
}
