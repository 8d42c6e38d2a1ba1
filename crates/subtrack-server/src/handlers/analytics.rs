//! Analytics handlers
//!
//! Each request loads the user's active subscriptions and settings, then runs
//! one analytics component against today's date.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, AuthUser};
use subtrack_core::analytics::{
    AnalysisContext, CategoryBreakdown, DeadWeightReport, Overview, RecommendationReport,
    TrendReport, DEFAULT_TREND_MONTHS,
};
use subtrack_core::models::{Subscription, UserSettings};

/// Query params for the trend series
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Kept as text so a malformed value falls back to the default instead of rejecting
    pub months: Option<String>,
}

/// Number of months requested; missing, unparseable or zero means the default
pub fn requested_months(raw: Option<&str>) -> i64 {
    raw.and_then(|m| m.trim().parse::<i64>().ok())
        .filter(|m| *m != 0)
        .unwrap_or(DEFAULT_TREND_MONTHS)
}

fn load_snapshot(
    state: &AppState,
    user_id: i64,
) -> Result<(Vec<Subscription>, Option<UserSettings>), AppError> {
    let subscriptions = state.db.list_active_subscriptions(user_id)?;
    let settings = state.db.get_settings(user_id)?;
    Ok((subscriptions, settings))
}

/// GET /api/analytics/overview - Totals and renewals due in the next 30 days
pub async fn analytics_overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Overview>, AppError> {
    let (subs, settings) = load_snapshot(&state, user.id)?;
    let ctx = AnalysisContext::current(&subs, settings.as_ref());
    Ok(Json(ctx.overview()?))
}

/// GET /api/analytics/by-category - Spend grouped by category
pub async fn analytics_by_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CategoryBreakdown>, AppError> {
    let (subs, settings) = load_snapshot(&state, user.id)?;
    let ctx = AnalysisContext::current(&subs, settings.as_ref());
    Ok(Json(ctx.categories()?))
}

/// GET /api/analytics/dead-weight - Subscriptions not used recently
pub async fn analytics_dead_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeadWeightReport>, AppError> {
    let (subs, settings) = load_snapshot(&state, user.id)?;
    let ctx = AnalysisContext::current(&subs, settings.as_ref());
    Ok(Json(ctx.dead_weight()?))
}

/// GET /api/analytics/trends?months=N - Month-by-month spend
pub async fn analytics_trends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendReport>, AppError> {
    let months = requested_months(query.months.as_deref());
    let (subs, settings) = load_snapshot(&state, user.id)?;
    let ctx = AnalysisContext::current(&subs, settings.as_ref());
    Ok(Json(ctx.trends(months)?))
}

/// GET /api/analytics/recommendations - Ranked savings suggestions
pub async fn analytics_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RecommendationReport>, AppError> {
    let (subs, settings) = load_snapshot(&state, user.id)?;
    let ctx = AnalysisContext::current(&subs, settings.as_ref());
    Ok(Json(ctx.recommendations()?))
}
