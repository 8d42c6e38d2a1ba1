//! Authentication-related handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::issue_token;
use crate::{AppError, AppState, AuthUser};
use subtrack_core::models::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response for register and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: User,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/auth/register - Create a user with default settings and return a token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let user = state
        .db
        .create_user(&email, &password, req.name.as_deref())
        .map_err(AppError::from_input)?;
    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_days)?;

    info!(user_id = user.id, "Issued token at registration");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login - Verify credentials and return a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let user = state
        .db
        .verify_password(&email, &password)
        .map_err(AppError::from_input)?;
    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_days)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user,
    }))
}

/// GET /api/me - The user this request is acting as
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .db
        .get_user(auth.id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(MeResponse { user }))
}
