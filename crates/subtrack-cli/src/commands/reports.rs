//! Report command implementations
//!
//! Every report analyzes the user's active subscriptions as of today (UTC).
//! `--json` prints the same structure the web API returns.

use anyhow::{Context, Result};
use subtrack_core::analytics::{AnalysisContext, Priority};
use subtrack_core::db::Database;
use subtrack_core::models::{Subscription, UserSettings};

use super::{print_json, truncate};

/// Active subscriptions and settings for one user
fn load_snapshot(db: &Database, user_id: i64) -> Result<(Vec<Subscription>, Option<UserSettings>)> {
    let subscriptions = db
        .list_active_subscriptions(user_id)
        .context("Failed to load subscriptions")?;
    let settings = db.get_settings(user_id).context("Failed to load settings")?;
    Ok((subscriptions, settings))
}

pub fn cmd_report_overview(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let (subscriptions, settings) = load_snapshot(db, user_id)?;
    let report = AnalysisContext::current(&subscriptions, settings.as_ref()).overview()?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("📊 Overview");
    println!("   ─────────────────────────────");
    println!("   Active subscriptions: {}", report.total_subscriptions);
    println!("   Monthly total:        ${:.2}", report.monthly_total);
    println!("   Yearly total:         ${:.2}", report.yearly_total);

    if !report.upcoming_renewals.is_empty() {
        println!();
        println!("   📅 Upcoming renewals");
        for sub in &report.upcoming_renewals {
            println!(
                "      {}  {:20} ${}",
                sub.next_billing_date,
                truncate(&sub.name, 20),
                sub.cost
            );
        }
    }

    Ok(())
}

pub fn cmd_report_categories(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let (subscriptions, settings) = load_snapshot(db, user_id)?;
    let report = AnalysisContext::current(&subscriptions, settings.as_ref()).categories()?;

    if json {
        return print_json(&report);
    }

    if report.categories.is_empty() {
        println!("No active subscriptions.");
        return Ok(());
    }

    println!();
    println!("🏷️  Spending by Category");
    println!("   ─────────────────────────────────────────────");
    for category in &report.categories {
        println!(
            "   {:25} {:>3} subs  ${:>9.2}/mo",
            truncate(&category.category, 25),
            category.count,
            category.monthly_total
        );
    }

    Ok(())
}

pub fn cmd_report_dead_weight(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let (subscriptions, settings) = load_snapshot(db, user_id)?;
    let report = AnalysisContext::current(&subscriptions, settings.as_ref()).dead_weight()?;

    if json {
        return print_json(&report);
    }

    if report.subscriptions.is_empty() {
        println!(
            "✅ No dead weight: everything was used within {} days.",
            report.threshold_days
        );
        return Ok(());
    }

    println!();
    println!(
        "🪦 Dead Weight (unused for {}+ days)",
        report.threshold_days
    );
    println!("   ─────────────────────────────────────────────");
    for entry in &report.subscriptions {
        println!(
            "   {:20} ${:>8}  {}",
            truncate(&entry.subscription.name, 20),
            entry.subscription.cost,
            entry.reason
        );
    }
    println!();
    println!(
        "   💰 Potential savings: ${:.2}/mo, ${:.2}/yr",
        report.potential_savings.monthly, report.potential_savings.yearly
    );

    Ok(())
}

pub fn cmd_report_trends(db: &Database, user_id: i64, months: i64, json: bool) -> Result<()> {
    let (subscriptions, settings) = load_snapshot(db, user_id)?;
    let report = AnalysisContext::current(&subscriptions, settings.as_ref()).trends(months)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("📈 Monthly Spending Trend");
    println!("   ─────────────────────────────");
    for point in &report.trends {
        println!("   {:10} ${:>9.2}", point.month, point.total);
    }

    Ok(())
}

pub fn cmd_report_recommendations(db: &Database, user_id: i64, json: bool) -> Result<()> {
    let (subscriptions, settings) = load_snapshot(db, user_id)?;
    let report = AnalysisContext::current(&subscriptions, settings.as_ref()).recommendations()?;

    if json {
        return print_json(&report);
    }

    if report.recommendations.is_empty() {
        println!("✅ No savings suggestions right now.");
        return Ok(());
    }

    println!();
    println!("💡 Recommendations");
    println!("   ─────────────────────────────────────────────");
    for rec in &report.recommendations {
        let marker = match rec.priority {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        };
        println!("   {} {}", marker, rec.title);
        println!("      {}", rec.description);
        println!("      Potential savings: ${:.2}", rec.potential_savings);
    }
    println!();
    println!(
        "   💰 Total potential savings: ${:.2}",
        report.total_potential_savings
    );

    Ok(())
}
