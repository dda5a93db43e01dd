//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs, attaching the
//! bearer token and reading error bodies.

use contracts::system::auth::ErrorBody;
use gloo_net::http::Response;

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/rest/deals");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// `Bearer <token>` for the stored access token, if signed in
pub fn bearer_header() -> Option<String> {
    storage::get_access_token().map(|token| format!("Bearer {}", token))
}

/// Message of a failed response: the `{ "error": ... }` body when present,
/// otherwise the HTTP status
pub async fn error_message(response: Response) -> String {
    let status = response.status();
    let status_text = response.status_text();
    match response.text().await {
        Ok(text) => match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => format!("HTTP {} {}", status, status_text),
        },
        Err(_) => format!("HTTP {} {}", status, status_text),
    }
}
