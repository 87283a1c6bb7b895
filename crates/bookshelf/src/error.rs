use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use bookshelf_core::storage::{repository_error_to_status_code, RepositoryError};

/// Application error type returned by handlers and extractors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Could not validate credentials")]
    InvalidCredentials,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Repository(err) => {
                StatusCode::from_u16(repository_error_to_status_code(err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::InvalidCredentials | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full but surfaced without
        // entity details.
        let detail = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_404() {
        let err = AppError::Repository(RepositoryError::NotFound {
            entity_type: "Book",
            id: "b-1".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn repository_conflict_maps_to_409() {
        let err = AppError::Repository(RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "a@x.com".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn connection_failure_maps_to_503() {
        let err = AppError::Repository(RepositoryError::ConnectionFailed("down".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn credential_errors_map_to_403() {
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
