//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Database location
//!
//! ```bash
//! # Full URL
//! export DATABASE_URL="sqlite://data/clients.db"
//!
//! # Or just a file path
//! export DB_PATH="data/clients.db"
//! ```
//!
//! If neither is set, `sqlite://clients.db` in the working directory is used.
//! The file is created on first start.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `LOG_DIR` - Also write daily-rotated log files into this directory
//! - `DEFAULT_PAGE_LIMIT` - `limit` used by `GET /clients` when omitted (default: 100)
//! - `DB_MAX_CONNECTIONS`, `DB_CONNECT_TIMEOUT`, `DB_IDLE_TIMEOUT`, `DB_MAX_LIFETIME` - Pool settings

use anyhow::Result;
use std::env;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://clients.db";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Directory for rolling log files. Console-only logging when `None`.
    pub log_dir: Option<String>,
    pub default_page_limit: u32,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// Idle connection lifetime in seconds before it is closed
    /// (`DB_IDLE_TIMEOUT`, default: 600).
    pub db_idle_timeout: u64,
    /// Maximum connection lifetime in seconds (`DB_MAX_LIFETIME`, default: 1800).
    pub db_max_lifetime: u64,
}

/// Reads and parses an optional variable, falling back to `default` when it is
/// unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so required variables can be added
    /// without changing callers.
    pub fn from_env() -> Result<Self> {
        let database_url = Self::load_database_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let log_dir = env::var("LOG_DIR").ok().filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            listen_addr,
            log_level,
            log_format,
            log_dir,
            default_page_limit: env_or("DEFAULT_PAGE_LIMIT", 100),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5),
            db_connect_timeout: env_or("DB_CONNECT_TIMEOUT", 30),
            db_idle_timeout: env_or("DB_IDLE_TIMEOUT", 600),
            db_max_lifetime: env_or("DB_MAX_LIFETIME", 1800),
        })
    }

    /// Resolves the database URL.
    ///
    /// Priority:
    /// 1. `DATABASE_URL` environment variable
    /// 2. `sqlite://` + `DB_PATH`
    /// 3. `sqlite://clients.db`
    fn load_database_url() -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }

        match env::var("DB_PATH") {
            Ok(path) if !path.is_empty() => format!("sqlite://{}", path),
            _ => DEFAULT_DATABASE_URL.to_string(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `database_url` is not a SQLite URL
    /// - a pool or paging setting is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.default_page_limit == 0 {
            anyhow::bail!("DEFAULT_PAGE_LIMIT must be at least 1");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!(
            "  Pool: max {} connections, acquire timeout {}s",
            self.db_max_connections,
            self.db_connect_timeout
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        match &self.log_dir {
            Some(dir) => tracing::info!("  Log files: {}", dir),
            None => tracing::info!("  Log files: disabled"),
        }
        tracing::info!("  Default page limit: {}", self.default_page_limit);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
