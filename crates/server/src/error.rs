//! Unified error-to-response mapping.
//!
//! Handlers return `Result<T, ApiError>`; the `IntoResponse` impl is the only
//! place HTTP status codes are decided, so the core modules stay free of HTTP
//! concerns. Every error body is `{"error": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::graph::GraphError;
use crate::sheet::SheetError;

/// Application-level error type for the catalog server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was not supplied.
    #[error("missing {0} query parameter")]
    MissingParam(&'static str),

    /// Auth service failure (configuration, login, token exchange).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// OneDrive/Graph failure.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Spreadsheet fetch/parse failure.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingParam(_) => StatusCode::BAD_REQUEST,
            // malformed share reference is a client-input problem; everything
            // else (auth unavailable, transport, upstream status) is a 500
            Self::Graph(GraphError::Resolution(_)) => StatusCode::BAD_REQUEST,
            Self::Sheet(SheetError::InvalidUrl) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
