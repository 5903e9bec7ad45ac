//! Core domain entities representing the client data model.
//!
//! Entities are plain data structures without persistence logic.
//!
//! # Entity Types
//!
//! - [`Client`] - Root of the aggregate
//! - [`ClientMeta`] - One-to-one personal profile
//! - [`ClientSituation`] - One-to-one financial situation
//! - [`Contrat`] - One-to-many loan contracts
//! - [`MaritalStatus`] - Closed set of `situation_familiale` values
//!
//! # Design Pattern
//!
//! Separate structs are used for each stage of the lifecycle:
//! - `NewClient` and friends - For creating new records
//! - `ClientPatch` and friends - For partial updates

pub mod client;
pub mod marital_status;

pub use client::{
    Client, ClientMeta, ClientMetaPatch, ClientPatch, ClientSituation, ClientSituationPatch,
    Contrat, NewClient, NewClientMeta, NewClientSituation, NewContrat,
};
pub use marital_status::{MaritalStatus, UnknownMaritalStatus};
