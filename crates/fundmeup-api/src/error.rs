use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error taxonomy. Every variant renders as `{"message": "..."}` with
/// the mapped status; `Internal` hides its cause from the client and logs it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials.")]
    Auth,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Assistant service failure; carries the raw upstream response body.
    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error.")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref cause) = self {
            error!("internal error: {:#}", cause);
        }

        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// spawn_blocking results come back double-wrapped; flatten the join error
/// into the taxonomy.
pub fn flatten_join<T>(
    result: Result<Result<T, ApiError>, tokio::task::JoinError>,
) -> Result<T, ApiError> {
    result.map_err(|e| ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Auth.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn auth_error_is_generic() {
        // one message regardless of which field was wrong
        assert_eq!(ApiError::Auth.to_string(), "Invalid credentials.");
    }

    #[test]
    fn upstream_error_surfaces_raw_body() {
        let err = ApiError::Upstream(r#"{"error":"quota exceeded"}"#.into());
        assert_eq!(err.to_string(), r#"{"error":"quota exceeded"}"#);
    }
}
