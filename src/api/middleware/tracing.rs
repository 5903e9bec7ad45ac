//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Opens an `INFO` span per request (method, URI, version) so that every log
/// line emitted by handlers and services is attributed to its request, and
/// records status and latency in milliseconds on response.
///
/// ```text
/// INFO request{method=PUT uri=/clients/3 version=HTTP/1.1}: Client 3 updated client_id=3
/// INFO request{method=PUT uri=/clients/3 version=HTTP/1.1}: finished processing request latency=5 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
