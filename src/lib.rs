//! # Client CRUD API
//!
//! A REST service managing client profiles stored in SQLite, built with Axum
//! and sqlx.
//!
//! A client is an aggregate of four records: the client row itself, one meta
//! record (personal attributes), one situation record (financial attributes)
//! and any number of loan contracts. The aggregate is created, read, merged
//! and deleted as a unit.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Client aggregate and repository trait
//! - **Application Layer** ([`application`]) - Client and CSV import services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool, sessions and repository
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://clients.db"
//!
//! # Migrations run automatically on startup
//! cargo run
//!
//! # Bulk load a CSV export
//! cargo run --bin admin -- import clients.csv
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for the admin binary
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ClientService, ImportService};
    pub use crate::domain::entities::{Client, ClientPatch, MaritalStatus, NewClient};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{Database, SqliteClientRepository};
    pub use crate::state::AppState;
}
