//! User settings handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{AppError, AppState, AuthUser};
use subtrack_core::models::{SettingsUpdate, UserSettings};

#[derive(Serialize)]
pub struct SettingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub settings: UserSettings,
}

/// GET /api/users/settings - Current settings, defaults if never saved
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = state.db.get_settings(user.id)?.unwrap_or_default();
    Ok(Json(SettingsResponse {
        message: None,
        settings,
    }))
}

/// PUT /api/users/settings - Update any subset of the settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = state
        .db
        .update_settings(user.id, &update)
        .map_err(AppError::from_input)?;

    Ok(Json(SettingsResponse {
        message: Some("Settings updated successfully"),
        settings,
    }))
}
