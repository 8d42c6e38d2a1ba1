//! Shared fixtures for unit tests

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{BillingCycle, Subscription, SubscriptionStatus};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An active subscription created 2024-01-01, billing on 2024-02-01, never used
pub fn subscription(
    id: i64,
    name: &str,
    cost: Decimal,
    billing_cycle: BillingCycle,
    category: &str,
) -> Subscription {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Subscription {
        id,
        user_id: 1,
        name: name.to_string(),
        cost,
        billing_cycle,
        category: category.to_string(),
        next_billing_date: date(2024, 2, 1),
        last_used: None,
        notes: None,
        status: SubscriptionStatus::Active,
        created_at: created,
        updated_at: created,
    }
}
