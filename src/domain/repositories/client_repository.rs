//! Repository trait for client aggregate data access.

use crate::domain::entities::{Client, ClientPatch, NewClient};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the client aggregate.
///
/// Every method runs in its own unit of work: a pooled connection for reads,
/// a transaction for writes. A write either commits completely or leaves the
/// database untouched.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteClientRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_client.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Inserts a client with its meta, situation and contracts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the database rejects the insert.
    async fn create(&self, new_client: NewClient) -> Result<Client, AppError>;

    /// Inserts many clients in a single transaction.
    ///
    /// Returns the number of clients stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if any insert fails; nothing is stored.
    async fn create_many(&self, new_clients: Vec<NewClient>) -> Result<u64, AppError>;

    /// Finds a client by id, with all children resolved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError>;

    /// Lists clients ordered by id.
    ///
    /// # Arguments
    ///
    /// - `skip` - Number of clients to skip
    /// - `limit` - Maximum number of clients returned
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Client>, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the client does not exist.
    /// Returns [`AppError::Persistence`] if the database rejects the update.
    async fn update(&self, id: i64, patch: ClientPatch) -> Result<Client, AppError>;

    /// Deletes a client and, by cascade, everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the client does not exist.
    /// Returns [`AppError::Persistence`] on database errors.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Row counts per table, in schema order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, AppError>;

    /// Checks that the database answers.
    async fn ping(&self) -> Result<(), AppError>;
}
