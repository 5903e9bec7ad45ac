//! Per-request access logging.

use axum::{
    extract::{ConnectInfo, Request},
    http::header,
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};

/// Logs every inbound request and the status it was answered with.
///
/// The peer address comes from [`ConnectInfo`] when the server was started
/// with `into_make_service_with_connect_info`; otherwise it is logged as `-`.
///
/// # Example Logs
///
/// ```text
/// INFO Incoming request method=POST path=/clients client=127.0.0.1 user_agent=curl/8.5.0
/// INFO Response sent method=POST path=/clients status=201 elapsed_ms=4
/// ```
pub async fn layer(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info!(
        method = %method,
        path = %path,
        client = %client,
        user_agent = %user_agent,
        "Incoming request"
    );

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Response sent"
    );

    response
}
