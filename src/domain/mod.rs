//! Domain layer containing the client data model and data access contracts.
//!
//! # Architecture
//!
//! - [`entities`] - The client aggregate and its create/patch inputs
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod entities;
pub mod repositories;
