//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_sub(name: &str, cost: rust_decimal::Decimal, cycle: BillingCycle) -> NewSubscription {
        NewSubscription {
            name: name.to_string(),
            cost,
            billing_cycle: cycle,
            category: "Entertainment".to_string(),
            next_billing_date: date(2024, 2, 1),
            last_used: None,
            notes: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();
        assert!(db.list_subscriptions(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('subscriptions') WHERE name IN ('id', 'user_id', 'name', 'cost', 'billing_cycle', 'category', 'next_billing_date', 'last_used', 'notes', 'status', 'created_at', 'updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 12, "subscriptions table should have 12 expected columns");

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('user_settings') WHERE name IN ('user_id', 'email_notifications', 'renewal_reminder_days', 'unused_threshold_days')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtrack.db");
        let path = path.to_str().unwrap();

        let db = Database::new_unencrypted(path).unwrap();
        let user = db.ensure_user("a@example.com").unwrap();
        drop(db);

        let reopened = Database::new_unencrypted(path).unwrap();
        assert_eq!(reopened.path(), path);
        assert_eq!(
            reopened.get_user_by_email("a@example.com").unwrap().unwrap().id,
            user.id
        );
    }

    #[test]
    fn test_derive_key_is_stable() {
        let a = derive_key("correct horse").unwrap();
        let b = derive_key("correct horse").unwrap();
        let c = derive_key("battery staple").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_parse_datetime_formats() {
        let dt = parse_datetime("2024-03-01 08:15:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T08:15:00+00:00");
        assert!(parse_datetime("2024-03-01T08:15:00.250").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_create_user_and_verify_password() {
        let db = Database::in_memory().unwrap();

        let user = db
            .create_user("Alice@Example.com", "hunter22", Some("Alice"))
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.name.as_deref(), Some("Alice"));

        // Default settings row created with the user
        let settings = db.get_settings(user.id).unwrap().unwrap();
        assert_eq!(settings, UserSettings::default());

        let verified = db.verify_password("alice@example.com", "hunter22").unwrap();
        assert_eq!(verified.id, user.id);

        assert!(matches!(
            db.verify_password("alice@example.com", "wrong-pass"),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            db.verify_password("nobody@example.com", "hunter22"),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn test_password_is_hashed() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("bob@example.com", "s3cret!", None).unwrap();

        let conn = db.conn().unwrap();
        let stored: String = conn
            .query_row(
                "SELECT password_hash FROM users WHERE id = ?",
                params![user.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_ne!(stored, "s3cret!");
        assert!(stored.starts_with("$argon2"));
    }

    #[test]
    fn test_create_user_validation() {
        let db = Database::in_memory().unwrap();

        assert!(matches!(
            db.create_user("short@example.com", "12345", None),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.create_user("  ", "123456", None),
            Err(Error::InvalidData(_))
        ));

        db.create_user("dup@example.com", "123456", None).unwrap();
        assert!(matches!(
            db.create_user("DUP@example.com", "abcdef", None),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_ensure_user_is_idempotent_and_local_only() {
        let db = Database::in_memory().unwrap();

        let first = db.ensure_user("local@localhost").unwrap();
        let second = db.ensure_user("local@localhost").unwrap();
        assert_eq!(first.id, second.id);

        assert!(db.get_settings(first.id).unwrap().is_some());
        assert!(matches!(
            db.verify_password("local@localhost", "!"),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn test_subscription_crud() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let created = db
            .create_subscription(user.id, &new_sub("Netflix", dec!(15.99), BillingCycle::Monthly))
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.user_id, user.id);
        assert_eq!(created.cost, dec!(15.99));
        assert_eq!(created.status, SubscriptionStatus::Active);

        let fetched = db.get_subscription(user.id, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);

        let updated = db
            .update_subscription(
                user.id,
                created.id,
                &SubscriptionUpdate {
                    cost: Some(dec!(17.99)),
                    notes: Some(Some("Price went up".to_string())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.cost, dec!(17.99));
        assert_eq!(updated.name, "Netflix");
        assert_eq!(updated.notes.as_deref(), Some("Price went up"));

        // Some(None) clears a nullable column
        let cleared = db
            .update_subscription(
                user.id,
                created.id,
                &SubscriptionUpdate {
                    notes: Some(None),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(cleared.notes, None);

        assert!(db.delete_subscription(user.id, created.id).unwrap());
        assert!(!db.delete_subscription(user.id, created.id).unwrap());
        assert!(db.get_subscription(user.id, created.id).unwrap().is_none());
    }

    #[test]
    fn test_cost_stored_as_exact_text() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let sub = db
            .create_subscription(user.id, &new_sub("Gym", dec!(40), BillingCycle::Monthly))
            .unwrap();
        assert_eq!(sub.cost.to_string(), "40.00");

        let conn = db.conn().unwrap();
        let raw: String = conn
            .query_row(
                "SELECT cost FROM subscriptions WHERE id = ?",
                params![sub.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "40.00");
    }

    #[test]
    fn test_negative_cost_rejected() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let result =
            db.create_subscription(user.id, &new_sub("Refund", dec!(-1), BillingCycle::Monthly));
        assert!(matches!(result, Err(Error::InvalidCost(_))));

        let result = db.create_subscription(user.id, &new_sub(" ", dec!(1), BillingCycle::Monthly));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_subscriptions_scoped_to_user() {
        let db = Database::in_memory().unwrap();
        let alice = db.ensure_user("alice@example.com").unwrap();
        let bob = db.ensure_user("bob@example.com").unwrap();

        let sub = db
            .create_subscription(alice.id, &new_sub("Hulu", dec!(7.99), BillingCycle::Monthly))
            .unwrap();

        assert!(db.get_subscription(bob.id, sub.id).unwrap().is_none());
        assert!(db
            .update_subscription(
                bob.id,
                sub.id,
                &SubscriptionUpdate {
                    name: Some("Stolen".to_string()),
                    ..Default::default()
                }
            )
            .unwrap()
            .is_none());
        assert!(!db.delete_subscription(bob.id, sub.id).unwrap());
        assert!(db.list_subscriptions(bob.id).unwrap().is_empty());
        assert_eq!(db.list_subscriptions(alice.id).unwrap().len(), 1);
    }

    #[test]
    fn test_list_orders_and_active_filter() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let mut late = new_sub("Late", dec!(1), BillingCycle::Monthly);
        late.next_billing_date = date(2024, 5, 1);
        let mut soon = new_sub("Soon", dec!(1), BillingCycle::Monthly);
        soon.next_billing_date = date(2024, 1, 5);
        let mut paused = new_sub("Paused", dec!(1), BillingCycle::Monthly);
        paused.next_billing_date = date(2024, 3, 1);

        let late = db.create_subscription(user.id, &late).unwrap();
        let soon = db.create_subscription(user.id, &soon).unwrap();
        let paused = db.create_subscription(user.id, &paused).unwrap();
        db.update_subscription(
            user.id,
            paused.id,
            &SubscriptionUpdate {
                status: Some(SubscriptionStatus::Paused),
                ..Default::default()
            },
        )
        .unwrap();

        let names: Vec<String> = db
            .list_subscriptions(user.id)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Soon", "Paused", "Late"]);

        let active: Vec<i64> = db
            .list_active_subscriptions(user.id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(active, vec![late.id, soon.id]);
    }

    #[test]
    fn test_mark_subscription_used() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();
        let sub = db
            .create_subscription(user.id, &new_sub("Kindle", dec!(11.99), BillingCycle::Monthly))
            .unwrap();
        assert_eq!(sub.last_used, None);

        let used = db
            .mark_subscription_used(user.id, sub.id, date(2024, 4, 2))
            .unwrap()
            .unwrap();
        assert_eq!(used.last_used, Some(date(2024, 4, 2)));

        assert!(db
            .mark_subscription_used(user.id, 9999, date(2024, 4, 2))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupt_row_is_an_error() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();
        let sub = db
            .create_subscription(user.id, &new_sub("Broken", dec!(5), BillingCycle::Monthly))
            .unwrap();

        let conn = db.conn().unwrap();
        conn.execute(
            "UPDATE subscriptions SET cost = 'free' WHERE id = ?",
            params![sub.id],
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            db.list_active_subscriptions(user.id),
            Err(Error::InvalidCost(_))
        ));
    }

    #[test]
    fn test_settings_update() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let updated = db
            .update_settings(
                user.id,
                &SettingsUpdate {
                    unused_threshold_days: Some(30),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.unused_threshold_days, 30);
        assert_eq!(updated.renewal_reminder_days, 7);
        assert!(updated.email_notifications);

        let updated = db
            .update_settings(
                user.id,
                &SettingsUpdate {
                    email_notifications: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.email_notifications);
        assert_eq!(updated.unused_threshold_days, 30);

        assert!(matches!(
            db.update_settings(
                user.id,
                &SettingsUpdate {
                    unused_threshold_days: Some(0),
                    ..Default::default()
                }
            ),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_settings_upsert_when_row_missing() {
        let db = Database::in_memory().unwrap();
        let user = db.ensure_user("local@localhost").unwrap();

        let conn = db.conn().unwrap();
        conn.execute("DELETE FROM user_settings WHERE user_id = ?", params![user.id])
            .unwrap();
        drop(conn);
        assert!(db.get_settings(user.id).unwrap().is_none());

        let settings = db
            .update_settings(
                user.id,
                &SettingsUpdate {
                    renewal_reminder_days: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(settings.renewal_reminder_days, 3);
        assert_eq!(settings.unused_threshold_days, 90);
    }
}
