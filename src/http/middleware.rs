//! HTTP middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Request logging middleware
///
/// Runs each request inside a span tagged with a fresh request id so the
/// handler's log lines can be correlated.
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("request", id = %request_id);
    let start = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;

    let duration = start.elapsed();
    let status = response.status();

    span.in_scope(|| {
        if status.is_success() {
            info!("{} {} {} in {:?}", method, uri, status, duration);
        } else {
            warn!("{} {} {} in {:?}", method, uri, status, duration);
        }
    });

    response
}
