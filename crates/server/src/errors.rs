use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Errors a handler can return, always rendered as `{"error": ...}`.
///
/// Model failures during a workflow step are not errors at this level; they
/// come back to the client as a notice on the session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidBody(rejection) => rejection.status(),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        debug!(%status, "Request rejected: {message}");
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_missing_thing() {
        let err = AppError::NotFound("Session 1".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Session 1 not found");
    }
}
