//! Subscription management handlers
//!
//! All routes act on the authenticated user's subscriptions only; another
//! user's id answers 404 just like a missing one.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{AppError, AppState, AuthUser};
use subtrack_core::models::{
    BillingCycle, NewSubscription, Subscription, SubscriptionStatus, SubscriptionUpdate,
};
use subtrack_core::money::parse_cost;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub name: Option<String>,
    /// Number or decimal string
    pub cost: Option<Value>,
    pub billing_cycle: Option<String>,
    pub category: Option<String>,
    pub next_billing_date: Option<String>,
    pub last_used: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    pub cost: Option<Value>,
    pub billing_cycle: Option<String>,
    pub category: Option<String>,
    pub next_billing_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_used: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<Subscription>,
}

#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub subscription: Subscription,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Cost from a JSON number or string; `None` for null or blank
fn cost_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn parse_cost_value(value: &Value) -> Result<Decimal, AppError> {
    let text = cost_text(value).ok_or_else(|| AppError::bad_request("Invalid cost"))?;
    parse_cost(&text).map_err(AppError::from_input)
}

fn parse_cycle(value: &str) -> Result<BillingCycle, AppError> {
    value.parse().map_err(AppError::from_input)
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(&format!("Invalid {}: expected YYYY-MM-DD", field)))
}

/// Blank strings count as absent, like an omitted optional field
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/subscriptions - List the user's subscriptions, soonest renewal first
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SubscriptionListResponse>, AppError> {
    let subscriptions = state.db.list_subscriptions(user.id)?;
    Ok(Json(SubscriptionListResponse { subscriptions }))
}

/// POST /api/subscriptions - Create a subscription
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let (Some(name), Some(cost), Some(cycle), Some(category), Some(next_billing_date)) = (
        non_blank(req.name),
        req.cost.as_ref().and_then(cost_text),
        non_blank(req.billing_cycle),
        non_blank(req.category),
        non_blank(req.next_billing_date),
    ) else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let new = NewSubscription {
        name,
        cost: parse_cost(&cost).map_err(AppError::from_input)?,
        billing_cycle: parse_cycle(&cycle)?,
        category,
        next_billing_date: parse_date(&next_billing_date, "next_billing_date")?,
        last_used: non_blank(req.last_used)
            .map(|d| parse_date(&d, "last_used"))
            .transpose()?,
        notes: non_blank(req.notes),
    };

    let subscription = state
        .db
        .create_subscription(user.id, &new)
        .map_err(AppError::from_input)?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse {
            message: Some("Subscription created successfully"),
            subscription,
        }),
    ))
}

/// GET /api/subscriptions/:id - Fetch one subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state
        .db
        .get_subscription(user.id, id)?
        .ok_or_else(|| AppError::not_found("Subscription not found"))?;

    Ok(Json(SubscriptionResponse {
        message: None,
        subscription,
    }))
}

/// PUT /api/subscriptions/:id - Partially update a subscription
///
/// Omitted fields are left alone; `null` clears `last_used` or `notes`.
pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let update = SubscriptionUpdate {
        name: req.name,
        cost: req.cost.as_ref().map(parse_cost_value).transpose()?,
        billing_cycle: req.billing_cycle.as_deref().map(parse_cycle).transpose()?,
        category: req.category,
        next_billing_date: req
            .next_billing_date
            .as_deref()
            .map(|d| parse_date(d, "next_billing_date"))
            .transpose()?,
        last_used: req
            .last_used
            .map(|inner| {
                non_blank(inner)
                    .map(|d| parse_date(&d, "last_used"))
                    .transpose()
            })
            .transpose()?,
        notes: req.notes.map(non_blank),
        status: req
            .status
            .as_deref()
            .map(|s| {
                s.parse::<SubscriptionStatus>()
                    .map_err(|_| AppError::bad_request("Invalid status"))
            })
            .transpose()?,
    };

    let subscription = state
        .db
        .update_subscription(user.id, id, &update)
        .map_err(AppError::from_input)?
        .ok_or_else(|| AppError::not_found("Subscription not found"))?;

    Ok(Json(SubscriptionResponse {
        message: Some("Subscription updated successfully"),
        subscription,
    }))
}

/// DELETE /api/subscriptions/:id - Delete a subscription
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_subscription(user.id, id)? {
        return Err(AppError::not_found("Subscription not found"));
    }

    Ok(Json(MessageResponse {
        message: "Subscription deleted successfully",
    }))
}
