//! Application error handling.
//!
//! Every service error is mapped to an HTTP status here, in one place. Client
//! errors carry their own message; server errors are captured to Sentry and
//! surface a generic message so internals never leak.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ReviewError, TokenError, VerifierError};

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication or account management failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Review operation failure.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// Bearer credential failure at the request boundary.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository/database error outside a service.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed credentials.
    #[error("{0}")]
    Unauthorized(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Auth(e) => auth_status(e),
            Self::Review(e) => review_status(e),
            Self::Token(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::Database(_) => internal(),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        }
    }
}

fn auth_status(e: &AuthError) -> (StatusCode, String) {
    match e {
        AuthError::InvalidEmail(_) | AuthError::NameRequired | AuthError::WeakPassword(_) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        AuthError::InvalidCredentials
        | AuthError::CurrentPasswordMismatch
        | AuthError::EmailMismatch
        | AuthError::UserNotFound
        | AuthError::Verifier(VerifierError::Rejected(_)) => {
            (StatusCode::UNAUTHORIZED, e.to_string())
        }
        AuthError::UserAlreadyExists => (StatusCode::CONFLICT, e.to_string()),
        AuthError::Verifier(VerifierError::KeyFetch(_))
        | AuthError::Token(_)
        | AuthError::Repository(_)
        | AuthError::PasswordHash => internal(),
    }
}

fn review_status(e: &ReviewError) -> (StatusCode, String) {
    match e {
        ReviewError::InvalidRating(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        ReviewError::NotOwner => (StatusCode::FORBIDDEN, e.to_string()),
        ReviewError::ItemNotFound(_) | ReviewError::ReviewNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        ReviewError::AlreadyReviewed => (StatusCode::CONFLICT, e.to_string()),
        ReviewError::Repository(_) => internal(),
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_owned(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigear_core::{ItemId, RatingError, ReviewId};

    fn status_of(e: AppError) -> StatusCode {
        e.status_and_message().0
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::WeakPassword("short".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::EmailMismatch)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_review_error_statuses() {
        assert_eq!(
            status_of(AppError::Review(ReviewError::AlreadyReviewed)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Review(ReviewError::NotOwner)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::Review(ReviewError::ItemNotFound(ItemId::new(7)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Review(ReviewError::ReviewNotFound(
                ReviewId::new(7)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Review(ReviewError::InvalidRating(
                RatingError::OutOfRange {
                    value: 6.0,
                    min: 1.0,
                    max: 5.0
                }
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            status_of(AppError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Token(TokenError::Invalid)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let (status, message) = AppError::Database(RepositoryError::NotFound).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal server error");
    }
}
