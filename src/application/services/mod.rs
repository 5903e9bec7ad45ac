//! Business logic services for the application layer.

pub mod client_service;
pub mod import_service;

pub use client_service::{
    ClientService, CreateClientInput, DELETE_CONFIRMATION, UpdateClientInput,
};
pub use import_service::{ImportReport, ImportService};
