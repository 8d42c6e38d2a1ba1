//! Settings command implementations

use anyhow::{Context, Result};
use subtrack_core::db::Database;
use subtrack_core::models::{SettingsUpdate, UserSettings};

fn print_settings(settings: &UserSettings) {
    println!();
    println!("⚙️  Settings");
    println!("   ─────────────────────────────");
    println!(
        "   Email notifications:   {}",
        if settings.email_notifications { "on" } else { "off" }
    );
    println!("   Renewal reminder:      {} days before", settings.renewal_reminder_days);
    println!("   Unused threshold:      {} days", settings.unused_threshold_days);
}

pub fn cmd_settings_show(db: &Database, user_id: i64) -> Result<()> {
    let settings = db.get_settings(user_id)?.unwrap_or_default();
    print_settings(&settings);
    Ok(())
}

pub fn cmd_settings_set(
    db: &Database,
    user_id: i64,
    email_notifications: Option<bool>,
    reminder_days: Option<i64>,
    unused_days: Option<i64>,
) -> Result<()> {
    if email_notifications.is_none() && reminder_days.is_none() && unused_days.is_none() {
        anyhow::bail!(
            "Nothing to change. Pass --email-notifications, --reminder-days or --unused-days"
        );
    }

    let settings = db
        .update_settings(
            user_id,
            &SettingsUpdate {
                email_notifications,
                renewal_reminder_days: reminder_days,
                unused_threshold_days: unused_days,
            },
        )
        .context("Failed to update settings")?;

    println!("✅ Settings updated");
    print_settings(&settings);
    Ok(())
}
