//! Domain models for SubTrack

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How often a subscription charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BillingCycle {
    Monthly,
    Yearly,
    Weekly,
    Quarterly,
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 4] = [
        Self::Monthly,
        Self::Yearly,
        Self::Weekly,
        Self::Quarterly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Weekly => "weekly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "weekly" => Ok(Self::Weekly),
            "quarterly" => Ok(Self::Quarterly),
            _ => Err(Error::InvalidBillingCycle(s.to_string())),
        }
    }
}

impl TryFrom<String> for BillingCycle {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    /// Temporarily on hold, excluded from analytics
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(Error::InvalidData(format!("Unknown subscription status: {}", s))),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked recurring subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Price of one billing cycle, two decimal places
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub next_billing_date: NaiveDate,
    /// `None` means the user never marked it as used
    pub last_used: Option<NaiveDate>,
    pub notes: Option<String>,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a subscription
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub cost: Decimal,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub next_billing_date: NaiveDate,
    pub last_used: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Partial update for a subscription
///
/// `None` leaves a field untouched. For the nullable columns, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub cost: Option<Decimal>,
    pub billing_cycle: Option<BillingCycle>,
    pub category: Option<String>,
    pub next_billing_date: Option<NaiveDate>,
    pub last_used: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub status: Option<SubscriptionStatus>,
}

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && self.billing_cycle.is_none()
            && self.category.is_none()
            && self.next_billing_date.is_none()
            && self.last_used.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub email_notifications: bool,
    pub renewal_reminder_days: i64,
    /// Days without use before a subscription counts as dead weight
    pub unused_threshold_days: i64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            renewal_reminder_days: 7,
            unused_threshold_days: 90,
        }
    }
}

/// Partial update for user settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub email_notifications: Option<bool>,
    pub renewal_reminder_days: Option<i64>,
    pub unused_threshold_days: Option<i64>,
}
