//! User settings operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{SettingsUpdate, UserSettings};

impl Database {
    /// Settings row for a user, `None` if it was never created
    pub fn get_settings(&self, user_id: i64) -> Result<Option<UserSettings>> {
        let conn = self.conn()?;
        let settings = conn
            .query_row(
                r#"
                SELECT email_notifications, renewal_reminder_days, unused_threshold_days
                FROM user_settings
                WHERE user_id = ?
                "#,
                params![user_id],
                |row| {
                    Ok(UserSettings {
                        email_notifications: row.get(0)?,
                        renewal_reminder_days: row.get(1)?,
                        unused_threshold_days: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    /// Apply a partial update, creating the row with defaults if missing
    pub fn update_settings(&self, user_id: i64, update: &SettingsUpdate) -> Result<UserSettings> {
        if let Some(days) = update.renewal_reminder_days {
            if days < 0 {
                return Err(Error::InvalidData(format!(
                    "renewal_reminder_days must not be negative: {}",
                    days
                )));
            }
        }
        if let Some(days) = update.unused_threshold_days {
            if days <= 0 {
                return Err(Error::InvalidData(format!(
                    "unused_threshold_days must be positive: {}",
                    days
                )));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO user_settings (user_id, email_notifications, renewal_reminder_days, unused_threshold_days)
            VALUES (?1, COALESCE(?2, 1), COALESCE(?3, 7), COALESCE(?4, 90))
            ON CONFLICT(user_id) DO UPDATE SET
                email_notifications = COALESCE(?2, email_notifications),
                renewal_reminder_days = COALESCE(?3, renewal_reminder_days),
                unused_threshold_days = COALESCE(?4, unused_threshold_days),
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                user_id,
                update.email_notifications,
                update.renewal_reminder_days,
                update.unused_threshold_days,
            ],
        )?;
        drop(conn);

        debug!(user_id, "Settings updated");
        self.get_settings(user_id)?
            .ok_or_else(|| Error::NotFound(format!("Settings for user {}", user_id)))
    }
}
