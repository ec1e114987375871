use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application error taxonomy. "No match" cases are not errors and are
/// returned as `None` / empty collections instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("missing identity")]
    MissingIdentity,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wire-level error kind, mirrored by clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid-argument",
            Self::MissingIdentity => "missing-identity",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MissingIdentity => (StatusCode::UNAUTHORIZED, "Sign in required".to_string()),
            Self::Internal(e) => {
                // Details stay in the log; the body is deliberately opaque.
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing your request".to_string(),
                )
            }
        };

        let body = Json(json!({ "kind": self.kind(), "message": message }));
        (status, body).into_response()
    }
}
