//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ClientService;
use crate::infrastructure::persistence::SqliteClientRepository;

/// Client service wired to the SQLite repository.
pub type SqliteClientService = ClientService<SqliteClientRepository>;

#[derive(Clone)]
pub struct AppState {
    pub client_service: Arc<SqliteClientService>,
    /// `limit` used by `GET /clients` when the query omits it.
    pub default_page_limit: u32,
}

impl AppState {
    pub fn new(client_service: Arc<SqliteClientService>, default_page_limit: u32) -> Self {
        Self {
            client_service,
            default_page_limit,
        }
    }
}
