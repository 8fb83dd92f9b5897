use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret gate for mutating routes.
///
/// Fails closed: with no secret configured every request is rejected, whatever
/// the caller sends. A matching key forwards the request unchanged.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = match state.api_key.as_deref() {
        Some(key) => key,
        None => {
            tracing::error!("Rejecting {} {}: API key is not configured", request.method(), request.uri().path());
            return Err(ApiError::auth_config_error("Server configuration error"));
        }
    };

    match extract_api_key(&headers) {
        Some(provided) if provided == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key for {} {}", request.method(), request.uri().path());
            Err(ApiError::unauthorized("Unauthorized: Invalid API Key"))
        }
        None => {
            tracing::warn!("Missing API key for {} {}", request.method(), request.uri().path());
            Err(ApiError::unauthorized("Unauthorized: Invalid API Key"))
        }
    }
}

/// Extract the API key from headers. Non-UTF-8 values count as absent.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER)?.to_str().ok()
}
