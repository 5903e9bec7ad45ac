//! Handlers for client CRUD endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::client::{
    ClientResponse, CreateClientRequest, DeleteClientResponse, UpdateClientRequest,
};
use crate::api::dto::pagination::ListParams;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a client with its meta, situation and contracts.
///
/// # Endpoint
///
/// `POST /clients`
///
/// # Errors
///
/// Returns 400 if the payload is malformed, fails validation, carries a
/// badly formatted `date_creation_compte`, or is rejected by the database.
pub async fn create_client_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    let Json(payload) = payload?;
    tracing::info!("Creating client");
    payload.validate()?;

    let client = state.client_service.create_client(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// Lists clients with offset pagination.
///
/// # Endpoint
///
/// `GET /clients?skip=0&limit=100`
pub async fn list_clients_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let Query(params) = params?;
    let (skip, limit) = params.skip_limit(state.default_page_limit);
    tracing::info!(skip, limit, "Listing clients");

    let clients = state.client_service.list_clients(skip, limit).await?;

    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

/// Reads a single client.
///
/// # Endpoint
///
/// `GET /clients/{id}`
///
/// # Errors
///
/// Returns 400 if `id` is not an integer.
/// Returns 404 if the client does not exist.
pub async fn get_client_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<ClientResponse>, AppError> {
    let Path(id) = id?;
    tracing::info!(client_id = id, "Reading client");

    let client = state.client_service.get_client(id).await?;

    Ok(Json(client.into()))
}

/// Partially updates a client.
///
/// # Endpoint
///
/// `PUT /clients/{id}`
///
/// See [`UpdateClientRequest`] for the merge rules.
///
/// # Errors
///
/// Returns 400 on validation or database rejection.
/// Returns 404 if the client does not exist.
pub async fn update_client_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateClientRequest>, JsonRejection>,
) -> Result<Json<ClientResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    tracing::info!(client_id = id, "Updating client");
    payload.validate()?;

    let client = state
        .client_service
        .update_client(id, payload.into_input()?)
        .await?;

    Ok(Json(client.into()))
}

/// Deletes a client and everything it owns.
///
/// # Endpoint
///
/// `DELETE /clients/{id}`
///
/// # Errors
///
/// Returns 404 if the client does not exist.
/// Returns 500 if the database fails to delete it.
pub async fn delete_client_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<DeleteClientResponse>, AppError> {
    let Path(id) = id?;
    tracing::info!(client_id = id, "Deleting client");

    let detail = state.client_service.delete_client(id).await?;

    Ok(Json(DeleteClientResponse { detail }))
}
