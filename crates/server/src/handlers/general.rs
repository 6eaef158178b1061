//! # General Route Handlers

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// The handler for the root (`/`) endpoint: the single-page workflow UI.
pub async fn root() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
