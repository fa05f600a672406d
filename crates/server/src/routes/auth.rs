//! Authentication and account handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInRequest {
    pub id_token: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful login/registration payload: the bearer credential plus the
/// user it authenticates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(state.pool(), state.tokens(), state.verifier())
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = auth_service(&state).login(&req.email, &req.password).await?;
    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, token) = auth_service(&state)
        .register(&req.name, &req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/google-signin
pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(req): Json<GoogleSignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = auth_service(&state)
        .google_sign_in(&req.id_token, &req.email)
        .await?;
    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let updated = auth_service(&state).update_profile(&user, &req.name).await?;
    Ok(Json(updated))
}

/// PUT /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    auth_service(&state)
        .change_password(&user, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(json!({ "message": "Password changed successfully" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_deserialize_camel_case() {
        let req: GoogleSignInRequest =
            serde_json::from_str(r#"{"idToken": "abc", "email": "jane@example.com"}"#).unwrap();
        assert_eq!(req.id_token, "abc");

        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"currentPassword": "old", "newPassword": "new123"}"#).unwrap();
        assert_eq!(req.current_password, "old");
        assert_eq!(req.new_password, "new123");
    }
}
