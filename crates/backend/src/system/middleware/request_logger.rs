use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_bytes;

/// Logs every HTTP request: elapsed ms, response size, status, method and path
///
/// Client and server errors are logged at `warn`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Read the body to learn the real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{:>5}ms | {:>12} | {} {:>6} {} ({})",
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                path,
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed = start.elapsed().as_millis();
    let status = parts.status;
    if status.is_client_error() || status.is_server_error() {
        tracing::warn!(
            "{:>5}ms | {:>12} | {} {:>6} {}",
            elapsed,
            format_bytes(bytes.len()),
            status.as_u16(),
            method,
            path
        );
    } else {
        tracing::info!(
            "{:>5}ms | {:>12} | {} {:>6} {}",
            elapsed,
            format_bytes(bytes.len()),
            status.as_u16(),
            method,
            path
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
