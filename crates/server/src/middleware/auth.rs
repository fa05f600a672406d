//! Bearer credential extraction.
//!
//! `CurrentUser` is the only way handlers learn who is calling. The user row
//! is loaded fresh on every request, so a name change is visible immediately
//! and a deleted account stops authenticating even while its token is live.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

        let email = state.tokens().verify(token)?;

        let user = UserRepository::new(state.pool())
            .get_by_email(&email)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).expect("valid request").into_parts();
        parts
    }

    #[test]
    fn test_extracts_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_rejects_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_rejects_non_bearer_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }
}
