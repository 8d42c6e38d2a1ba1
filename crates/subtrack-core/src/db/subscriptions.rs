//! Subscription operations
//!
//! Every query is scoped by `user_id`; a subscription owned by another user
//! behaves exactly like one that does not exist.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewSubscription, Subscription, SubscriptionUpdate};
use crate::money::normalize_cost;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, name, cost, billing_cycle, category, \
     next_billing_date, last_used, notes, status, created_at, updated_at";

/// Column values as SQLite returns them, before domain parsing
struct SubscriptionRow {
    id: i64,
    user_id: i64,
    name: String,
    cost: String,
    billing_cycle: String,
    category: String,
    next_billing_date: String,
    last_used: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl SubscriptionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            cost: row.get(3)?,
            billing_cycle: row.get(4)?,
            category: row.get(5)?,
            next_billing_date: row.get(6)?,
            last_used: row.get(7)?,
            notes: row.get(8)?,
            status: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        let cost: Decimal = row
            .cost
            .parse()
            .map_err(|_| Error::InvalidCost(row.cost.clone()))?;

        Ok(Subscription {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            cost,
            billing_cycle: row.billing_cycle.parse()?,
            category: row.category,
            next_billing_date: parse_date(&row.next_billing_date)?,
            last_used: row.last_used.as_deref().map(parse_date).transpose()?,
            notes: row.notes,
            status: row.status.parse()?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} is required", field)));
    }
    Ok(())
}

impl Database {
    pub fn create_subscription(&self, user_id: i64, new: &NewSubscription) -> Result<Subscription> {
        require_text(&new.name, "name")?;
        require_text(&new.category, "category")?;
        let cost = normalize_cost(new.cost)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO subscriptions
                (user_id, name, cost, billing_cycle, category, next_billing_date, last_used, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                new.name.trim(),
                cost.to_string(),
                new.billing_cycle.as_str(),
                new.category,
                new.next_billing_date.to_string(),
                new.last_used.map(|d| d.to_string()),
                new.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(user_id, subscription_id = id, "Subscription created");
        self.get_subscription(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))
    }

    pub fn get_subscription(&self, user_id: i64, id: i64) -> Result<Option<Subscription>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM subscriptions WHERE id = ? AND user_id = ?",
                    SUBSCRIPTION_COLUMNS
                ),
                params![id, user_id],
                SubscriptionRow::from_row,
            )
            .optional()?;
        row.map(Subscription::try_from).transpose()
    }

    /// All of a user's subscriptions, soonest renewal first
    pub fn list_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.query_subscriptions(
            &format!(
                "SELECT {} FROM subscriptions WHERE user_id = ? ORDER BY next_billing_date ASC, id ASC",
                SUBSCRIPTION_COLUMNS
            ),
            user_id,
        )
    }

    /// Active subscriptions in storage order, the input to analytics
    pub fn list_active_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.query_subscriptions(
            &format!(
                "SELECT {} FROM subscriptions WHERE user_id = ? AND status = 'active' ORDER BY id ASC",
                SUBSCRIPTION_COLUMNS
            ),
            user_id,
        )
    }

    fn query_subscriptions(&self, query: &str, user_id: i64) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(query)?;
        let rows = stmt
            .query_map(params![user_id], SubscriptionRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    /// Apply a partial update; returns `None` if the subscription does not exist
    pub fn update_subscription(
        &self,
        user_id: i64,
        id: i64,
        update: &SubscriptionUpdate,
    ) -> Result<Option<Subscription>> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = &update.name {
            require_text(name, "name")?;
            sets.push("name = ?");
            values.push(Box::new(name.trim().to_string()));
        }
        if let Some(cost) = update.cost {
            sets.push("cost = ?");
            values.push(Box::new(normalize_cost(cost)?.to_string()));
        }
        if let Some(cycle) = update.billing_cycle {
            sets.push("billing_cycle = ?");
            values.push(Box::new(cycle.as_str()));
        }
        if let Some(category) = &update.category {
            require_text(category, "category")?;
            sets.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(date) = update.next_billing_date {
            sets.push("next_billing_date = ?");
            values.push(Box::new(date.to_string()));
        }
        if let Some(last_used) = update.last_used {
            sets.push("last_used = ?");
            values.push(Box::new(last_used.map(|d| d.to_string())));
        }
        if let Some(notes) = &update.notes {
            sets.push("notes = ?");
            values.push(Box::new(notes.clone()));
        }
        if let Some(status) = update.status {
            sets.push("status = ?");
            values.push(Box::new(status.as_str()));
        }

        if sets.is_empty() {
            return self.get_subscription(user_id, id);
        }
        sets.push("updated_at = CURRENT_TIMESTAMP");

        let query = format!(
            "UPDATE subscriptions SET {} WHERE id = ? AND user_id = ?",
            sets.join(", ")
        );
        values.push(Box::new(id));
        values.push(Box::new(user_id));

        let conn = self.conn()?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|p| p.as_ref()).collect();
        let changed = conn.execute(&query, params_refs.as_slice())?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        debug!(user_id, subscription_id = id, fields = sets.len() - 1, "Subscription updated");
        self.get_subscription(user_id, id)
    }

    /// Returns whether a row was deleted
    pub fn delete_subscription(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM subscriptions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted > 0 {
            info!(user_id, subscription_id = id, "Subscription deleted");
        }
        Ok(deleted > 0)
    }

    /// Record that the subscription was used on `date`
    pub fn mark_subscription_used(
        &self,
        user_id: i64,
        id: i64,
        date: NaiveDate,
    ) -> Result<Option<Subscription>> {
        self.update_subscription(
            user_id,
            id,
            &SubscriptionUpdate {
                last_used: Some(Some(date)),
                ..Default::default()
            },
        )
    }
}
