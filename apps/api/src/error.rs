//! Error types for the HTTP API.
//!
//! Every failure leaves the server as `{"code": ..., "message": ...}` with
//! the status the shop error maps to.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use folio_shop::ShopError;

use crate::auth::AuthError;

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Malformed request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Shop(e) => match e {
                ShopError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ShopError::Unauthorized => StatusCode::FORBIDDEN,
                ShopError::NotFound { .. } => StatusCode::NOT_FOUND,
                ShopError::InvalidInput(_)
                | ShopError::EmptyCart
                | ShopError::InvalidCartItem { .. } => StatusCode::BAD_REQUEST,
                ShopError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(AuthError::Issue(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Shop(e) => e.code(),
            ApiError::Auth(AuthError::Issue(_)) => "INTERNAL_ERROR",
            ApiError::Auth(_) => "UNAUTHENTICATED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage details go to the log, not the client.
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(ShopError::Unauthenticated), StatusCode::UNAUTHORIZED),
            (ApiError::from(ShopError::Unauthorized), StatusCode::FORBIDDEN),
            (ApiError::from(ShopError::not_found("Order", "x")), StatusCode::NOT_FOUND),
            (ApiError::from(ShopError::InvalidInput("q".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(ShopError::EmptyCart), StatusCode::BAD_REQUEST),
            (
                ApiError::from(ShopError::InvalidCartItem {
                    book_id: "B2".into(),
                    reason: "gone".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(ShopError::PersistenceFailure("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::from(AuthError::MissingToken), StatusCode::UNAUTHORIZED),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = ApiError::from(ShopError::PersistenceFailure("disk full".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
