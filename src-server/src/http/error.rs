//! Error responses: `{"detail": "..."}` with a status matching the domain error

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::DomainError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }
        let detail = match self {
            DomainError::NotFound(m)
            | DomainError::InvalidInput(m)
            | DomainError::Conflict(m)
            | DomainError::Internal(m) => m,
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
