use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
};
use service_core::error::AppError;

use crate::models::parse_batch;
use crate::services::relay_batch;
use crate::startup::AppState;

/// Body of every 400 from the relay endpoint. Deliberately says nothing about
/// what failed.
pub const INVALID_DATA: &str = "invalid data";

/// `POST /api/{token}`: relay a batch of log events as push notifications.
///
/// Wrong method and wrong token both produce the generic 404, so the endpoint
/// is indistinguishable from an unknown route. Per-item delivery failures are
/// logged and never change the 200.
#[tracing::instrument(skip_all)]
pub async fn relay_events(
    State(state): State<AppState>,
    request: Request,
) -> Result<StatusCode, AppError> {
    if request.method() != Method::POST {
        return Err(AppError::NotFound);
    }

    let authorized = request_token(request.uri().path())
        .is_some_and(|token| state.config.token_matches(&token));
    if !authorized {
        return Err(AppError::NotFound);
    }

    let body = to_bytes(request.into_body(), state.config.api.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Failed to read event batch body");
            AppError::BadRequest(INVALID_DATA.to_string())
        })?;

    let batch = parse_batch(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed event batch");
        AppError::BadRequest(INVALID_DATA.to_string())
    })?;

    // Detached so a caller hanging up does not cut the batch short.
    let provider = state.provider.clone();
    let relay = tokio::spawn(async move { relay_batch(provider.as_ref(), &batch).await });

    match relay.await {
        Ok(outcome) => tracing::debug!(
            attempted = outcome.attempted,
            failed = outcome.failed,
            "Relayed event batch"
        ),
        Err(e) => tracing::error!(error = %e, "Relay task did not complete"),
    }

    Ok(StatusCode::OK)
}

/// Token carried by a raw request path, percent-decoded.
///
/// The whole path is decoded before the last segment is taken, so an encoded
/// `/` separates segments. `None` when the decoded path is not UTF-8.
pub fn request_token(raw_path: &str) -> Option<String> {
    let path = urlencoding::decode(raw_path).ok()?;
    Some(token_from_path(&path).to_string())
}

/// Last non-empty segment of a request path, ignoring trailing slashes.
pub fn token_from_path(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_last_segment() {
        assert_eq!(token_from_path("/api/s3cret"), "s3cret");
        assert_eq!(token_from_path("/api/nested/s3cret"), "s3cret");
        assert_eq!(token_from_path("/api/s3cret/"), "s3cret");
        assert_eq!(token_from_path("/api/s3cret//"), "s3cret");
    }

    #[test]
    fn request_token_is_percent_decoded() {
        assert_eq!(request_token("/api/%74est-token").as_deref(), Some("test-token"));
        assert_eq!(request_token("/api/my%20secret").as_deref(), Some("my secret"));
        assert_eq!(request_token("/api/%C3%A9t%C3%A9").as_deref(), Some("été"));
        assert_eq!(request_token("/api/plain").as_deref(), Some("plain"));
    }

    #[test]
    fn encoded_slash_splits_segments() {
        assert_eq!(request_token("/api/outer%2Finner").as_deref(), Some("inner"));
    }

    #[test]
    fn undecodable_path_has_no_token() {
        assert!(request_token("/api/%FF%FE").is_none());
    }

    #[test]
    fn bare_prefix_yields_prefix_segment() {
        assert_eq!(token_from_path("/api/"), "api");
        assert_eq!(token_from_path("/"), "");
    }
}
