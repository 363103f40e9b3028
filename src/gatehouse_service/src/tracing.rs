//! Span and event hooks for the HTTP trace layer.

use std::time::Duration;

use axum::http::{Request, Response};
use tracing::Span;
use uuid::Uuid;

/// One span per request, tagged with a fresh request id so every log line
/// emitted while handling it can be correlated.
pub fn make_span_with_request_id<B>(request: &Request<B>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "http_request",
        %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

pub fn on_request<B>(_request: &Request<B>, _span: &Span) {
    tracing::info!("started processing request");
}

pub fn on_response<B>(response: &Response<B>, latency: Duration, _span: &Span) {
    let status = response.status();
    if status.is_server_error() {
        tracing::error!(%status, latency_ms = latency.as_millis(), "finished processing request");
    } else {
        tracing::info!(%status, latency_ms = latency.as_millis(), "finished processing request");
    }
}
