//! Shared error type for API handlers and storage helpers.
//!
//! Handlers return `ApiError` and let `IntoResponse` map each variant to a
//! stable HTTP status. Database and upstream failures are logged server-side
//! and surfaced as opaque `500`/`502` responses without leaking details.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or rejected input, `400`.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed or expired credentials, `401`.
    #[error("{0}")]
    Authentication(&'static str),

    /// Authenticated but not allowed, `403`.
    #[error("{0}")]
    Authorization(&'static str),

    /// Resource does not exist or is outside the caller's scope, `404`.
    #[error("{0}")]
    NotFound(&'static str),

    /// Unique constraint violations, `409`.
    #[error("{0}")]
    Conflict(&'static str),

    /// Photo provider or media host failure, `502`.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Database failure, `500`.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Anything else that should not leak to clients, `500`.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<crate::media::MediaError> for ApiError {
    fn from(err: crate::media::MediaError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Authentication(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            Self::Authorization(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
            }
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Self::Conflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
            }
            Self::Upstream(message) => {
                error!("Upstream error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "upstream service unavailable" })),
                )
                    .into_response()
            }
            Self::Database(err) => {
                error!("Database error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Internal(err) => {
                error!("Internal error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Returns `true` when the error is a Postgres unique constraint violation.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_are_stable() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Authentication("no token"),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Authorization("denied"), StatusCode::FORBIDDEN),
            (ApiError::NotFound("missing"), StatusCode::NOT_FOUND),
            (ApiError::Conflict("duplicate"), StatusCode::CONFLICT),
            (ApiError::Upstream("boom".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn database_errors_do_not_leak() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
