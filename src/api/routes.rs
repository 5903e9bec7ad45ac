//! API route configuration.

use crate::api::handlers::{
    create_client_handler, delete_client_handler, get_client_handler, list_clients_handler,
    update_client_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Client CRUD routes.
///
/// # Endpoints
///
/// - `GET    /clients`        - List clients (`skip`, `limit`)
/// - `POST   /clients`        - Create a client with its children
/// - `GET    /clients/{id}`   - Read one client
/// - `PUT    /clients/{id}`   - Partially update a client
/// - `DELETE /clients/{id}`   - Delete a client and its children
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clients",
            get(list_clients_handler).post(create_client_handler),
        )
        .route(
            "/clients/{id}",
            get(get_client_handler)
                .put(update_client_handler)
                .delete(delete_client_handler),
        )
}
