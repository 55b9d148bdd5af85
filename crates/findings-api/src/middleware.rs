//! Cross-cutting layers for the router
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::cors::CorsLayer;

/// The dashboard front end is served from another origin
pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Log method, path, status and latency for every request
pub async fn request_logging(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
