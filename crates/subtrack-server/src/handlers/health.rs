//! Liveness endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnvironment {
    pub auth_required: bool,
    pub jwt_secret_set: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub environment: HealthEnvironment,
}

/// GET /api/health - Report that the API is up and how it is configured
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "API is working",
        version: env!("CARGO_PKG_VERSION"),
        environment: HealthEnvironment {
            auth_required: state.config.require_auth,
            jwt_secret_set: !state.config.jwt_secret.is_empty(),
        },
    })
}
