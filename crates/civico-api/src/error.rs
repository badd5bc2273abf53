use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use civico_db::DbError;
use civico_types::api::MessageResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a failed write: unique violations become `conflict`, anything
    /// else is reported as `action` followed by the storage message.
    pub fn from_write(err: DbError, conflict: &str, action: &str) -> Self {
        match err {
            DbError::Conflict(detail) => {
                warn!("{}: {}", conflict, detail);
                Self::Conflict(conflict.to_string())
            }
            other => {
                error!("{}: {}", action, other);
                Self::Internal(format!("{action}: {other}"))
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!("storage error: {}", err);
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn write_errors_keep_storage_message() {
        let err = ApiError::from_write(
            DbError::Lock("poisoned".into()),
            "duplicate",
            "failed to add contact",
        );
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(
            err.to_string(),
            "failed to add contact: database lock poisoned: poisoned"
        );

        let err = ApiError::from_write(DbError::Conflict("UNIQUE".into()), "duplicate", "x");
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate"));
    }
}
