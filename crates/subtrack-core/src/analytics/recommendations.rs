//! Savings recommendations
//!
//! Two rules feed a single candidate list:
//! - Duplicate categories: several subscriptions sharing a category label
//! - Expensive subscriptions: a high effective monthly price
//!
//! Both rules work on raw per-cycle cost rather than normalized amounts. The
//! expensive rule divides by 12 for yearly plans only; weekly and quarterly
//! plans are compared against the threshold at their per-cycle price.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{BillingCycle, Subscription};
use crate::money::{round_currency, validate_cost};

/// Share of a duplicated category's raw cost assumed recoverable by consolidating
const DUPLICATE_SAVINGS_RATE: Decimal = dec!(0.3);

/// Share of an expensive subscription's raw cost assumed recoverable
const EXPENSIVE_SAVINGS_RATE: Decimal = dec!(0.2);

/// Effective monthly price above which a subscription is flagged
pub const EXPENSIVE_MONTHLY_THRESHOLD: Decimal = dec!(50);

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    DuplicateCategory,
    Expensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric weight for ranking (higher = shown first)
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSubscription {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
}

impl From<&Subscription> for RecommendedSubscription {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.id,
            name: sub.name.clone(),
            cost: sub.cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub potential_savings: Decimal,
    pub priority: Priority,
    pub subscriptions: Vec<RecommendedSubscription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    /// Sum over every generated candidate, including those cut from `recommendations`
    #[serde(with = "rust_decimal::serde::float")]
    pub total_potential_savings: Decimal,
}

/// One recommendation per category holding more than one subscription
fn duplicate_categories(subscriptions: &[Subscription]) -> Vec<Recommendation> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Subscription>)> = Vec::new();

    for sub in subscriptions {
        let slot = *index.entry(sub.category.as_str()).or_insert_with(|| {
            groups.push((sub.category.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(sub);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(category, members)| {
            let raw_total: Decimal = members.iter().map(|s| s.cost).sum();
            Recommendation {
                recommendation_type: RecommendationType::DuplicateCategory,
                title: format!("Multiple {} subscriptions", category),
                description: format!(
                    "You have {} subscriptions in {}. Consider consolidating to save money.",
                    members.len(),
                    category
                ),
                potential_savings: round_currency(raw_total * DUPLICATE_SAVINGS_RATE),
                priority: Priority::Medium,
                subscriptions: members.into_iter().map(RecommendedSubscription::from).collect(),
            }
        })
        .collect()
}

fn effective_monthly_cost(sub: &Subscription) -> Decimal {
    match sub.billing_cycle {
        BillingCycle::Yearly => sub.cost / dec!(12),
        BillingCycle::Monthly | BillingCycle::Weekly | BillingCycle::Quarterly => sub.cost,
    }
}

/// One recommendation per subscription above the expensive threshold
fn expensive_subscriptions(subscriptions: &[Subscription]) -> Vec<Recommendation> {
    subscriptions
        .iter()
        .filter(|sub| effective_monthly_cost(sub) > EXPENSIVE_MONTHLY_THRESHOLD)
        .map(|sub| Recommendation {
            recommendation_type: RecommendationType::Expensive,
            title: format!("Review {}", sub.name),
            description: format!(
                "{} costs ${} per {}. Look for alternatives or discounts.",
                sub.name, sub.cost, sub.billing_cycle
            ),
            potential_savings: round_currency(sub.cost * EXPENSIVE_SAVINGS_RATE),
            priority: Priority::Low,
            subscriptions: vec![RecommendedSubscription::from(sub)],
        })
        .collect()
}

pub fn recommend(subscriptions: &[Subscription]) -> Result<RecommendationReport> {
    for sub in subscriptions {
        validate_cost(sub.cost)?;
    }

    let mut candidates = duplicate_categories(subscriptions);
    candidates.extend(expensive_subscriptions(subscriptions));

    // Stable: equal keys keep generation order
    candidates.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then_with(|| b.potential_savings.cmp(&a.potential_savings))
    });

    let total: Decimal = candidates.iter().map(|r| r.potential_savings).sum();
    candidates.truncate(MAX_RECOMMENDATIONS);

    Ok(RecommendationReport {
        recommendations: candidates,
        total_potential_savings: round_currency(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::subscription;

    #[test]
    fn test_duplicate_category_savings() {
        let subs = vec![
            subscription(1, "Linear", dec!(20), BillingCycle::Monthly, "Tools"),
            subscription(2, "Notion", dec!(20), BillingCycle::Monthly, "Tools"),
            subscription(3, "Figma", dec!(20), BillingCycle::Monthly, "Tools"),
        ];

        let report = recommend(&subs).unwrap();
        assert_eq!(report.recommendations.len(), 1);

        let rec = &report.recommendations[0];
        assert_eq!(rec.recommendation_type, RecommendationType::DuplicateCategory);
        assert_eq!(rec.priority, Priority::Medium);
        assert_eq!(rec.potential_savings, dec!(18.00));
        assert_eq!(rec.title, "Multiple Tools subscriptions");
        assert_eq!(
            rec.description,
            "You have 3 subscriptions in Tools. Consider consolidating to save money."
        );
        assert_eq!(rec.subscriptions.len(), 3);
        assert_eq!(report.total_potential_savings, dec!(18.00));
    }

    #[test]
    fn test_duplicate_uses_raw_cost() {
        // 0.3 * (120 + 10), not 0.3 * (10 + 10)
        let subs = vec![
            subscription(1, "Annual", dec!(120), BillingCycle::Yearly, "News"),
            subscription(2, "Monthly", dec!(10), BillingCycle::Monthly, "News"),
        ];

        let report = recommend(&subs).unwrap();
        assert_eq!(report.recommendations[0].potential_savings, dec!(39.00));
    }

    #[test]
    fn test_duplicate_iff_shared_category() {
        let unique = vec![
            subscription(1, "A", dec!(5), BillingCycle::Monthly, "One"),
            subscription(2, "B", dec!(5), BillingCycle::Monthly, "Two"),
        ];
        let report = recommend(&unique).unwrap();
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.recommendation_type != RecommendationType::DuplicateCategory));

        let shared = vec![
            subscription(1, "A", dec!(5), BillingCycle::Monthly, "One"),
            subscription(2, "B", dec!(5), BillingCycle::Monthly, "One"),
        ];
        let report = recommend(&shared).unwrap();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.recommendation_type == RecommendationType::DuplicateCategory));
    }

    #[test]
    fn test_expensive_rule_normalizes_only_yearly() {
        let subs = vec![
            // 600/12 = 50, not above threshold
            subscription(1, "Annual Exact", dec!(600), BillingCycle::Yearly, "A"),
            // 612/12 = 51
            subscription(2, "Annual Over", dec!(612), BillingCycle::Yearly, "B"),
            // Quarterly 60 compared raw
            subscription(3, "Quarterly", dec!(60.00), BillingCycle::Quarterly, "C"),
            // Weekly 20 compared raw, under threshold even though ~86/mo normalized
            subscription(4, "Weekly", dec!(20), BillingCycle::Weekly, "D"),
            subscription(5, "Monthly", dec!(50.01), BillingCycle::Monthly, "E"),
        ];

        let report = recommend(&subs).unwrap();
        let titles: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["Review Annual Over", "Review Quarterly", "Review Monthly"]
        );

        let quarterly = &report.recommendations[1];
        assert_eq!(quarterly.priority, Priority::Low);
        assert_eq!(quarterly.potential_savings, dec!(12.00));
        assert_eq!(
            quarterly.description,
            "Quarterly costs $60.00 per quarterly. Look for alternatives or discounts."
        );
    }

    #[test]
    fn test_ranking_priority_then_savings() {
        let subs = vec![
            subscription(1, "Big", dec!(300), BillingCycle::Monthly, "Solo"),
            subscription(2, "S1", dec!(5), BillingCycle::Monthly, "Pair"),
            subscription(3, "S2", dec!(5), BillingCycle::Monthly, "Pair"),
            subscription(4, "Bigger", dec!(400), BillingCycle::Monthly, "Other"),
            subscription(5, "T1", dec!(50), BillingCycle::Monthly, "Trio"),
            subscription(6, "T2", dec!(50), BillingCycle::Monthly, "Trio"),
        ];

        let report = recommend(&subs).unwrap();
        let titles: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        // Medium outranks low regardless of savings
        assert_eq!(
            titles,
            vec![
                "Multiple Trio subscriptions",
                "Multiple Pair subscriptions",
                "Review Bigger",
                "Review Big",
            ]
        );
    }

    #[test]
    fn test_truncates_list_but_totals_everything() {
        let subs: Vec<Subscription> = (1..=12)
            .map(|i| {
                subscription(
                    i,
                    &format!("Pro {}", i),
                    dec!(100),
                    BillingCycle::Monthly,
                    &format!("Cat {}", i),
                )
            })
            .collect();

        let report = recommend(&subs).unwrap();
        assert_eq!(report.recommendations.len(), MAX_RECOMMENDATIONS);
        // 12 candidates at 20.00 each
        assert_eq!(report.total_potential_savings, dec!(240.00));
        // Equal keys keep generation order
        assert_eq!(report.recommendations[0].title, "Review Pro 1");
        assert_eq!(report.recommendations[9].title, "Review Pro 10");
    }

    #[test]
    fn test_no_negative_savings() {
        let subs = vec![
            subscription(1, "Free", dec!(0), BillingCycle::Monthly, "Tier"),
            subscription(2, "Free2", dec!(0), BillingCycle::Monthly, "Tier"),
            subscription(3, "Pricey", dec!(99), BillingCycle::Monthly, "Solo"),
        ];

        let report = recommend(&subs).unwrap();
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.potential_savings >= Decimal::ZERO));
    }

    #[test]
    fn test_negative_cost_is_an_error() {
        let subs = vec![subscription(1, "Bad", dec!(-5), BillingCycle::Monthly, "X")];
        assert!(matches!(recommend(&subs), Err(Error::InvalidCost(_))));
    }

    #[test]
    fn test_json_shape() {
        let subs = vec![subscription(9, "Adobe", dec!(59.99), BillingCycle::Monthly, "Design")];
        let json = serde_json::to_value(recommend(&subs).unwrap()).unwrap();

        let rec = &json["recommendations"][0];
        assert_eq!(rec["type"], "expensive");
        assert_eq!(rec["priority"], "low");
        assert_eq!(rec["potentialSavings"], 12.0);
        assert_eq!(rec["subscriptions"][0]["id"], 9);
        assert_eq!(rec["subscriptions"][0]["cost"], "59.99");
        assert_eq!(json["totalPotentialSavings"], 12.0);
    }
}
