//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the UniMed API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `STORE_BACKEND`: `postgres` or `memory` (default: "postgres")
//! - `DATABASE_URL`: PostgreSQL connection string (required for the postgres backend)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `STORE_TIMEOUT_MS`: Upper bound for a single store call (default: 5000)
//! - `CLINIC_TIME_SLOTS`: `;`-separated slot labels (default: the reference catalog)
//! - `CLINIC_SLOT_CAPACITY`: Booked appointments allowed per slot and day (default: 5)

use std::{env, str::FromStr, time::Duration};

use eyre::{bail, eyre, Result, WrapErr};
use tracing::Level;
use unimed_core::{
    catalog::{DEFAULT_SLOT_CAPACITY, DEFAULT_TIME_SLOTS},
    SlotCatalog,
};

/// Where appointments are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local, lost on restart. Useful for demos and tests.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = eyre::Report;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(eyre!(
                "Invalid STORE_BACKEND value '{}': expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// Configuration for the UniMed API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use unimed_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    pub store_backend: StoreBackend,

    /// PostgreSQL database connection string, required for [`StoreBackend::Postgres`]
    pub database_url: Option<String>,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub store_timeout: Duration,

    pub time_slots: Vec<String>,

    pub slot_capacity: u32,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `STORE_BACKEND` is `postgres` and `DATABASE_URL` is not set
    /// - a numeric setting cannot be parsed
    /// - the slot catalog settings are invalid
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Store settings
        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;
        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable must be set when STORE_BACKEND=postgres");
        }
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;
        let store_timeout_ms: u64 = env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .wrap_err("Invalid STORE_TIMEOUT_MS value")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Clinic settings
        let time_slots = match env::var("CLINIC_TIME_SLOTS") {
            Ok(value) => parse_time_slots(&value),
            Err(_) => DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect(),
        };
        let slot_capacity = match env::var("CLINIC_SLOT_CAPACITY") {
            Ok(value) => value
                .trim()
                .parse()
                .wrap_err("Invalid CLINIC_SLOT_CAPACITY value")?,
            Err(_) => DEFAULT_SLOT_CAPACITY,
        };

        let config = Self {
            host,
            port,
            store_backend,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            store_timeout: Duration::from_millis(store_timeout_ms),
            time_slots,
            slot_capacity,
        };

        // Fail at start-up rather than on the first booking
        config.slot_catalog()?;

        Ok(config)
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn slot_catalog(&self) -> Result<SlotCatalog> {
        SlotCatalog::new(self.time_slots.iter().cloned(), self.slot_capacity)
            .wrap_err("Invalid clinic slot configuration")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 5,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            store_timeout: Duration::from_millis(5000),
            time_slots: DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect(),
            slot_capacity: DEFAULT_SLOT_CAPACITY,
        }
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_time_slots(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
