//! API error type and its HTTP mapping
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use findings_core::FindingsError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Findings(#[from] FindingsError),

    #[error("SESSION/unknown session {0}")]
    SessionNotFound(Uuid),

    #[error("METRICS/{0}")]
    Metrics(#[from] prometheus::Error),

    #[error("CONFIG/{0}")]
    Config(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Findings(FindingsError::Parse(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Findings(FindingsError::Parse(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Findings(FindingsError::Parse(rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Findings(err) => match err {
                FindingsError::NotFound { .. } => StatusCode::NOT_FOUND,
                FindingsError::DuplicateId { .. } => StatusCode::CONFLICT,
                FindingsError::InvalidEnum { .. }
                | FindingsError::InvariantViolation(_)
                | FindingsError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Metrics(_) | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Findings(err) => err.kind(),
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::Metrics(_) => "metrics",
            ApiError::Config(_) => "config",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
