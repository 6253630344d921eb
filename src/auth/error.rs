use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Business-level error taxonomy. Each kind maps to a stable status code;
/// message text never carries hashes, secrets, or backend detail.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email not found")]
    NotFound,

    #[error("email or password incorrect")]
    InvalidCredentials,

    #[error("invalid token")]
    Authentication,

    #[error("admin only")]
    Authorization,

    #[error("email already registered")]
    Conflict,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::Conflict,
            StoreError::Backend(e) => AuthError::Internal(e),
        }
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::Authentication => StatusCode::UNAUTHORIZED,
            AuthError::Authorization => StatusCode::FORBIDDEN,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_stable_status_codes() {
        assert_eq!(
            AuthError::Validation("'name' must be a non-empty string".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Authorization.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_display_never_reaches_clients() {
        let err = AuthError::Internal(anyhow::anyhow!("pool timed out at 10.0.0.1"));
        // the response body is built from a fixed string, not the source error
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
