//! Monthly spend trend
//!
//! The series is an as-of reconstruction: each month counts every subscription
//! that existed at the start of that month, at its current cost and cycle.
//! Price changes and cancellations are not replayed.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Subscription;
use crate::money::round_currency;

use super::normalize::monthly_cost;

/// Window used when the caller does not ask for one
pub const DEFAULT_TREND_MONTHS: i64 = 6;

/// Longest window reconstructed; larger requests are clamped
pub const MAX_TREND_MONTHS: i64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month label such as `"Oct 2026"`
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub trends: Vec<TrendPoint>,
}

/// Build `months` points, oldest first, ending with the month containing `today`
pub fn spending_trends(
    subscriptions: &[Subscription],
    months: i64,
    today: NaiveDate,
) -> Result<TrendReport> {
    if months <= 0 {
        return Ok(TrendReport { trends: Vec::new() });
    }
    if months > MAX_TREND_MONTHS {
        debug!(requested = months, max = MAX_TREND_MONTHS, "Clamping trend window");
    }
    let months = months.min(MAX_TREND_MONTHS);

    let priced: Vec<(DateTime<Utc>, Decimal)> = subscriptions
        .iter()
        .map(|sub| Ok((sub.created_at, monthly_cost(sub)?)))
        .collect::<Result<_>>()?;

    let current_month = today
        .with_day(1)
        .ok_or_else(|| Error::InvalidData(format!("No first day for {}", today)))?;

    let mut trends = Vec::with_capacity(months as usize);
    for back in (0..months).rev() {
        let month_start = current_month
            .checked_sub_months(Months::new(back as u32))
            .ok_or_else(|| {
                Error::InvalidData(format!("{} months before {} is out of range", back, today))
            })?;
        let boundary = month_start.and_time(NaiveTime::MIN).and_utc();

        let total: Decimal = priced
            .iter()
            .filter(|(created_at, _)| *created_at <= boundary)
            .map(|(_, monthly)| *monthly)
            .sum();

        trends.push(TrendPoint {
            month: month_start.format("%b %Y").to_string(),
            total: round_currency(total),
        });
    }

    Ok(TrendReport { trends })
}
