//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check (database)
//! - `/clients*`      - Client CRUD API
//!
//! # Middleware
//!
//! - **Tracing** - Request span with status and latency
//! - **Access log** - One line per request and per response
//! - **Path normalization** - `/clients/` and `/clients` are the same route

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{access_log, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::client_routes())
        .with_state(state)
        .layer(middleware::from_fn(access_log::layer))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
