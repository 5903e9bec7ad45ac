//! SQLite persistence.
//!
//! - [`Database`] - Connection pool owner handing out one session per operation
//! - [`SqliteClientRepository`] - Client aggregate storage and retrieval

pub mod database;
pub mod sqlite_client_repository;

pub use database::Database;
pub use sqlite_client_repository::SqliteClientRepository;
