//! SubTrack Core Library
//!
//! Shared functionality for the SubTrack subscription tracker:
//! - Database access and migrations (SQLCipher encrypted by default)
//! - User accounts and per-user settings
//! - Subscription models and exact money handling
//! - Analytics: overview, categories, dead weight, trends, recommendations

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod money;

#[cfg(test)]
mod test_utils;

pub use analytics::AnalysisContext;
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    BillingCycle, NewSubscription, SettingsUpdate, Subscription, SubscriptionStatus,
    SubscriptionUpdate, User, UserSettings,
};
