//! Spending by category

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{BillingCycle, Subscription};
use crate::money::round_currency;

use super::normalize::monthly_cost;

/// Subscription summary listed under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMember {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
    pub billing_cycle: BillingCycle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: String,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_total: Decimal,
    pub subscriptions: Vec<CategoryMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategorySpend>,
}

/// Group subscriptions by their verbatim category label
///
/// Categories come back ordered by monthly spend, highest first. Equal
/// totals keep the order in which the category was first seen.
pub fn by_category(subscriptions: &[Subscription]) -> Result<CategoryBreakdown> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut categories: Vec<CategorySpend> = Vec::new();

    for sub in subscriptions {
        let monthly = monthly_cost(sub)?;

        let slot = *index.entry(sub.category.as_str()).or_insert_with(|| {
            categories.push(CategorySpend {
                category: sub.category.clone(),
                count: 0,
                monthly_total: Decimal::ZERO,
                subscriptions: Vec::new(),
            });
            categories.len() - 1
        });

        let group = &mut categories[slot];
        group.count += 1;
        group.monthly_total += monthly;
        group.subscriptions.push(CategoryMember {
            id: sub.id,
            name: sub.name.clone(),
            cost: sub.cost,
            billing_cycle: sub.billing_cycle,
        });
    }

    for group in &mut categories {
        group.monthly_total = round_currency(group.monthly_total);
    }
    categories.sort_by(|a, b| b.monthly_total.cmp(&a.monthly_total));

    Ok(CategoryBreakdown { categories })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::subscription;
    use rust_decimal_macros::dec;

    #[test]
    fn test_groups_and_ranks_by_monthly_spend() {
        let subs = vec![
            subscription(1, "Netflix", dec!(15), BillingCycle::Monthly, "Entertainment"),
            subscription(2, "Spotify", dec!(10), BillingCycle::Monthly, "Entertainment"),
            subscription(3, "AWS", dec!(120), BillingCycle::Yearly, "Cloud"),
        ];

        let breakdown = by_category(&subs).unwrap();
        assert_eq!(breakdown.categories.len(), 2);

        let first = &breakdown.categories[0];
        assert_eq!(first.category, "Entertainment");
        assert_eq!(first.count, 2);
        assert_eq!(first.monthly_total, dec!(25.00));
        assert_eq!(first.subscriptions[0].name, "Netflix");
        assert_eq!(first.subscriptions[1].name, "Spotify");

        let second = &breakdown.categories[1];
        assert_eq!(second.category, "Cloud");
        assert_eq!(second.count, 1);
        assert_eq!(second.monthly_total, dec!(10.00));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let subs = vec![
            subscription(1, "A", dec!(5), BillingCycle::Monthly, "Zeta"),
            subscription(2, "B", dec!(5), BillingCycle::Monthly, "Alpha"),
            subscription(3, "C", dec!(60), BillingCycle::Yearly, "Mid"),
        ];

        let breakdown = by_category(&subs).unwrap();
        let names: Vec<&str> = breakdown
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_category_key_is_verbatim() {
        let subs = vec![
            subscription(1, "A", dec!(5), BillingCycle::Monthly, "Music"),
            subscription(2, "B", dec!(5), BillingCycle::Monthly, "music"),
            subscription(3, "C", dec!(5), BillingCycle::Monthly, "Music "),
        ];

        let breakdown = by_category(&subs).unwrap();
        assert_eq!(breakdown.categories.len(), 3);
    }

    #[test]
    fn test_rounds_only_the_total() {
        // Three quarterly $10 charges: 3.333.. each, 10.00 together
        let subs: Vec<_> = (1..=3)
            .map(|i| subscription(i, "Q", dec!(10), BillingCycle::Quarterly, "Storage"))
            .collect();

        let breakdown = by_category(&subs).unwrap();
        assert_eq!(breakdown.categories[0].monthly_total, dec!(10.00));
    }

    #[test]
    fn test_empty_input() {
        let breakdown = by_category(&[]).unwrap();
        assert!(breakdown.categories.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let subs = vec![subscription(
            7,
            "Dropbox",
            dec!(9.99),
            BillingCycle::Monthly,
            "Storage",
        )];
        let json = serde_json::to_value(by_category(&subs).unwrap()).unwrap();

        let category = &json["categories"][0];
        assert_eq!(category["category"], "Storage");
        assert_eq!(category["count"], 1);
        assert_eq!(category["monthlyTotal"], 9.99);
        assert_eq!(category["subscriptions"][0]["cost"], "9.99");
        assert_eq!(category["subscriptions"][0]["billing_cycle"], "monthly");
    }
}
