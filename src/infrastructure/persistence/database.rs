//! Database handle and per-operation session management.

use crate::config::Config;
use crate::error::AppError;

use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

/// Owner of the process-wide SQLite connection pool.
///
/// Created once at startup and shared through an `Arc`. Every repository
/// operation takes its own session from here: [`Database::acquire`] for reads,
/// [`Database::begin`] for writes. A transaction dropped without commit is
/// rolled back by sqlx, so a session never outlives the operation that opened
/// it, whatever path it exits by.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `config`.
    ///
    /// Foreign keys are switched on for every connection; cascade deletes
    /// depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot be opened.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("Invalid DATABASE_URL '{}'", config.database_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.db_connect_timeout));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect_with(options)
            .await
            .context("Failed to open database")?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool (used by tests).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations from `./migrations`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Checks out a pooled connection for a read-only operation.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, AppError> {
        Ok(self.pool.acquire().await?)
    }

    /// Opens a transaction for a write operation.
    ///
    /// Takes the write lock up front (`BEGIN IMMEDIATE`): concurrent writers
    /// wait on the busy timeout rather than failing with `SQLITE_BUSY_SNAPSHOT`.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Closes every connection. Pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Ends a write session: commits on success, rolls back on failure.
///
/// The original error is returned even if the rollback itself fails.
pub async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}
