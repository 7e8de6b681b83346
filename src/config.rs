//! Environment configuration
//!
//! Values come from the process environment, with `.env` loaded first by
//! `main` through dotenvy.

use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::cache::{DEFAULT_SETTINGS_CAPACITY, DEFAULT_SETTINGS_TTL};

/// Runtime configuration for the pricing service
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub settings_cache_capacity: u64,
    pub settings_cache_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            settings_cache_capacity: parse_or("SETTINGS_CACHE_CAPACITY", DEFAULT_SETTINGS_CAPACITY)?,
            settings_cache_ttl: Duration::from_secs(parse_or(
                "SETTINGS_CACHE_TTL_SECS",
                DEFAULT_SETTINGS_TTL.as_secs(),
            )?),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
