//! Subscription analytics
//!
//! Pure functions over a user's subscription list. Nothing here touches the
//! database; callers load subscriptions (usually the active ones) and hand
//! them in together with the date to evaluate against.
//!
//! ## Components
//!
//! - **Normalize** - per-cycle cost to monthly and yearly equivalents
//! - **Overview** - totals and renewals due in the next 30 days
//! - **Categories** - spend grouped by category label
//! - **Dead weight** - subscriptions not used within the staleness threshold
//! - **Trends** - month-by-month spend reconstruction
//! - **Recommendations** - consolidation and price review suggestions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subtrack_core::analytics::AnalysisContext;
//!
//! let subs = db.list_active_subscriptions(user_id)?;
//! let settings = db.get_settings(user_id)?;
//! let ctx = AnalysisContext::current(&subs, settings.as_ref());
//! let report = ctx.dead_weight()?;
//! ```

pub mod categories;
pub mod dead_weight;
pub mod normalize;
pub mod overview;
pub mod recommendations;
pub mod trends;

use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::models::{Subscription, UserSettings};

pub use categories::{by_category, CategoryBreakdown, CategoryMember, CategorySpend};
pub use dead_weight::{
    find_dead_weight, threshold_days, DeadWeightReport, DeadWeightSubscription, PotentialSavings,
    DEFAULT_UNUSED_THRESHOLD_DAYS,
};
pub use normalize::{monthly_cost, to_monthly, to_yearly, yearly_cost, WEEKS_PER_MONTH};
pub use overview::{overview, Overview, MAX_UPCOMING_RENEWALS, RENEWAL_WINDOW_DAYS};
pub use recommendations::{
    recommend, Priority, Recommendation, RecommendationReport, RecommendationType,
    RecommendedSubscription, EXPENSIVE_MONTHLY_THRESHOLD, MAX_RECOMMENDATIONS,
};
pub use trends::{spending_trends, TrendPoint, TrendReport, DEFAULT_TREND_MONTHS, MAX_TREND_MONTHS};

/// Inputs shared by every analytics component
pub struct AnalysisContext<'a> {
    /// Subscriptions to analyze
    pub subscriptions: &'a [Subscription],
    /// The owner's settings, if a row exists
    pub settings: Option<&'a UserSettings>,
    /// Date that "now" is evaluated against
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        subscriptions: &'a [Subscription],
        settings: Option<&'a UserSettings>,
        today: NaiveDate,
    ) -> Self {
        Self {
            subscriptions,
            settings,
            today,
        }
    }

    /// Context evaluated against the current UTC date
    pub fn current(subscriptions: &'a [Subscription], settings: Option<&'a UserSettings>) -> Self {
        Self::new(subscriptions, settings, Utc::now().date_naive())
    }

    pub fn overview(&self) -> Result<Overview> {
        overview(self.subscriptions, self.today)
    }

    pub fn categories(&self) -> Result<CategoryBreakdown> {
        by_category(self.subscriptions)
    }

    pub fn dead_weight(&self) -> Result<DeadWeightReport> {
        find_dead_weight(self.subscriptions, self.settings, self.today)
    }

    pub fn trends(&self, months: i64) -> Result<TrendReport> {
        spending_trends(self.subscriptions, months, self.today)
    }

    pub fn recommendations(&self) -> Result<RecommendationReport> {
        recommend(self.subscriptions)
    }
}
