//! Dead weight detection
//!
//! A subscription is dead weight when it was never marked as used, or when
//! its last use is older than the user's staleness threshold.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Subscription, UserSettings};
use crate::money::round_currency;

use super::normalize::{monthly_cost, yearly_cost};

/// Threshold used when the user has no usable setting
pub const DEFAULT_UNUSED_THRESHOLD_DAYS: i64 = 90;

/// A stale subscription with the reason it was flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadWeightSubscription {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub days_since_used: Option<i64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialSavings {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub yearly: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadWeightReport {
    pub subscriptions: Vec<DeadWeightSubscription>,
    pub count: usize,
    pub potential_savings: PotentialSavings,
    pub threshold_days: i64,
}

/// Staleness threshold from settings, falling back to the default when unset or not positive
pub fn threshold_days(settings: Option<&UserSettings>) -> i64 {
    settings
        .map(|s| s.unused_threshold_days)
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_UNUSED_THRESHOLD_DAYS)
}

pub fn find_dead_weight(
    subscriptions: &[Subscription],
    settings: Option<&UserSettings>,
    today: NaiveDate,
) -> Result<DeadWeightReport> {
    let threshold_days = threshold_days(settings);
    // None when the threshold reaches past the calendar's start; nothing used can be that old
    let cutoff = today.checked_sub_days(Days::new(threshold_days.unsigned_abs()));

    let mut stale: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|sub| match (sub.last_used, cutoff) {
            (None, _) => true,
            (Some(last_used), Some(cutoff)) => last_used < cutoff,
            (Some(_), None) => false,
        })
        .collect();

    // Raw per-cycle cost, not the normalized amount
    stale.sort_by(|a, b| b.cost.cmp(&a.cost));

    let mut monthly = Decimal::ZERO;
    let mut yearly = Decimal::ZERO;
    let mut flagged = Vec::with_capacity(stale.len());

    for sub in stale {
        monthly += monthly_cost(sub)?;
        yearly += yearly_cost(sub)?;

        let days_since_used = sub.last_used.map(|d| (today - d).num_days());
        let reason = match days_since_used {
            None => "Never marked as used".to_string(),
            Some(days) => format!("Not used in {} days", days),
        };

        flagged.push(DeadWeightSubscription {
            subscription: sub.clone(),
            days_since_used,
            reason,
        });
    }

    tracing::debug!(
        threshold_days,
        flagged = flagged.len(),
        total = subscriptions.len(),
        "Dead weight scan complete"
    );

    Ok(DeadWeightReport {
        count: flagged.len(),
        subscriptions: flagged,
        potential_savings: PotentialSavings {
            monthly: round_currency(monthly),
            yearly: round_currency(yearly),
        },
        threshold_days,
    })
}
