//! Application error types.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tastetrail_core::auth::AuthError;
use tastetrail_core::models::ValidationError;
use tastetrail_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::MessageResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(detail) => {
                error!(%detail, "request failed with internal error");
                "Internal server error".to_string()
            }
            AppError::Validation(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m) => m,
        };
        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::DbError(e) => AppError::Internal(e.to_string()),
            StoreError::Corrupt(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_are_unauthorized() {
        for e in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
        ] {
            assert_eq!(AppError::from(e).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn store_conflict_maps_to_409() {
        let e = AppError::from(StoreError::Conflict("taken".into()));
        assert_eq!(e.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_detail_is_not_rendered() {
        let resp = AppError::Internal("pool exhausted".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("pool exhausted"));
        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Internal server error"}));
    }
}
