//! Subscription command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use subtrack_core::db::Database;
use subtrack_core::models::{BillingCycle, NewSubscription, SubscriptionStatus, SubscriptionUpdate};
use subtrack_core::money::parse_cost;

use super::{print_json, truncate};

/// Arguments for `subscriptions add`, as typed on the command line
pub struct SubscriptionArgs {
    pub name: String,
    pub cost: String,
    pub cycle: String,
    pub category: String,
    pub next: String,
    pub last_used: Option<String>,
    pub notes: Option<String>,
}

/// Arguments for `subscriptions update`; `None` leaves a field alone
#[derive(Default)]
pub struct SubscriptionChanges {
    pub name: Option<String>,
    pub cost: Option<String>,
    pub cycle: Option<String>,
    pub category: Option<String>,
    pub next: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

fn parse_cycle(value: &str) -> Result<BillingCycle> {
    value
        .parse::<BillingCycle>()
        .context("Billing cycle must be one of: monthly, yearly, weekly, quarterly")
}

pub fn cmd_subscriptions_list(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let subscriptions = db.list_subscriptions(user_id)?;

    if json {
        return print_json(&subscriptions);
    }

    if subscriptions.is_empty() {
        println!("No subscriptions tracked yet. Run:");
        println!("  subtrack subscriptions add <name> --cost <amount> --category <category> --next <YYYY-MM-DD>");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in subscriptions {
        let status_icon = match sub.status {
            SubscriptionStatus::Active => "✅",
            SubscriptionStatus::Paused => "⏸️",
            SubscriptionStatus::Cancelled => "❌",
        };

        println!(
            "   {} {:>4} {:20} │ {:>9}/{:<9} │ {:15} │ next {}",
            status_icon,
            sub.id,
            truncate(&sub.name, 20),
            format!("${}", sub.cost),
            sub.billing_cycle,
            truncate(&sub.category, 15),
            sub.next_billing_date,
        );
    }

    Ok(())
}

pub fn cmd_subscriptions_add(db: &Database, user_id: i64, args: SubscriptionArgs) -> Result<()> {
    let new = NewSubscription {
        name: args.name,
        cost: parse_cost(&args.cost).context("Invalid --cost")?,
        billing_cycle: parse_cycle(&args.cycle)?,
        category: args.category,
        next_billing_date: parse_date(&args.next, "--next")?,
        last_used: args
            .last_used
            .as_deref()
            .map(|d| parse_date(d, "--last-used"))
            .transpose()?,
        notes: args.notes,
    };

    let sub = db
        .create_subscription(user_id, &new)
        .context("Failed to add subscription")?;

    println!(
        "✅ Added {} (ID: {}) at ${} {}",
        sub.name, sub.id, sub.cost, sub.billing_cycle
    );

    Ok(())
}

pub fn cmd_subscriptions_update(
    db: &Database,
    user_id: i64,
    id: i64,
    changes: SubscriptionChanges,
) -> Result<()> {
    let update = SubscriptionUpdate {
        name: changes.name,
        cost: changes
            .cost
            .as_deref()
            .map(|c| parse_cost(c).context("Invalid --cost"))
            .transpose()?,
        billing_cycle: changes.cycle.as_deref().map(parse_cycle).transpose()?,
        category: changes.category,
        next_billing_date: changes
            .next
            .as_deref()
            .map(|d| parse_date(d, "--next"))
            .transpose()?,
        last_used: None,
        notes: changes.notes.map(Some),
        status: changes
            .status
            .as_deref()
            .map(|s| {
                s.parse::<SubscriptionStatus>()
                    .context("Status must be one of: active, paused, cancelled")
            })
            .transpose()?,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field flag");
    }

    let sub = db
        .update_subscription(user_id, id, &update)?
        .ok_or_else(|| anyhow::anyhow!("Subscription not found: {}", id))?;

    println!("✅ Updated {} (ID: {})", sub.name, sub.id);
    Ok(())
}

pub fn cmd_subscriptions_used(
    db: &Database,
    user_id: i64,
    id: i64,
    date: Option<&str>,
) -> Result<()> {
    let used_on = match date {
        Some(d) => parse_date(d, "--date")?,
        None => Utc::now().date_naive(),
    };

    let sub = db
        .mark_subscription_used(user_id, id, used_on)?
        .ok_or_else(|| anyhow::anyhow!("Subscription not found: {}", id))?;

    println!("✅ Marked {} as used on {}", sub.name, used_on);
    Ok(())
}

pub fn cmd_subscriptions_remove(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_subscription(user_id, id)? {
        anyhow::bail!("Subscription not found: {}", id);
    }

    println!("🗑️  Removed subscription {}", id);
    Ok(())
}
