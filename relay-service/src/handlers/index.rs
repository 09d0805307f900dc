use axum::{http::Uri, response::Html};
use service_core::error::AppError;

pub const INDEX_HTML: &str = r#"<a href="https://suah.dev/pots">suah.dev/pots</a>"#;

pub async fn index(uri: Uri) -> Html<&'static str> {
    tracing::debug!(path = %uri.path(), "Serving index");
    Html(INDEX_HTML)
}

/// Fallback for every unrouted path.
pub async fn not_found(uri: Uri) -> AppError {
    // Tokens live in /api/ paths; keep them out of the log.
    if !uri.path().starts_with("/api/") {
        tracing::debug!(path = %uri.path(), "No route for path");
    }
    AppError::NotFound
}
