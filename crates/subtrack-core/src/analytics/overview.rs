//! Account overview: totals and upcoming renewals

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Subscription;
use crate::money::round_currency;

use super::normalize::{monthly_cost, yearly_cost};

/// How far ahead renewals are listed, inclusive
pub const RENEWAL_WINDOW_DAYS: u64 = 30;

/// Maximum number of upcoming renewals returned
pub const MAX_UPCOMING_RENEWALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_subscriptions: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub yearly_total: Decimal,
    pub upcoming_renewals: Vec<Subscription>,
}

pub fn overview(subscriptions: &[Subscription], today: NaiveDate) -> Result<Overview> {
    let mut monthly_total = Decimal::ZERO;
    let mut yearly_total = Decimal::ZERO;
    for sub in subscriptions {
        monthly_total += monthly_cost(sub)?;
        yearly_total += yearly_cost(sub)?;
    }

    let window_end = today
        .checked_add_days(Days::new(RENEWAL_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|sub| sub.next_billing_date >= today && sub.next_billing_date <= window_end)
        .collect();
    upcoming.sort_by_key(|sub| sub.next_billing_date);

    Ok(Overview {
        total_subscriptions: subscriptions.len(),
        monthly_total: round_currency(monthly_total),
        yearly_total: round_currency(yearly_total),
        upcoming_renewals: upcoming
            .into_iter()
            .take(MAX_UPCOMING_RENEWALS)
            .cloned()
            .collect(),
    })
}
