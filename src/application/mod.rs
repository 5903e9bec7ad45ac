//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation and logging. Services consume repository traits and provide a
//! clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::client_service::ClientService`] - Single-client create, read, update, delete
//! - [`services::import_service::ImportService`] - Bulk CSV import

pub mod services;
