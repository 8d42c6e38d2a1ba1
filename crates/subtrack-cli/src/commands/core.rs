//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `acting_user` - Resolve the `--user` account
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use subtrack_core::db::Database;
use subtrack_core::models::User;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// The user CLI commands act as, created on first use
pub fn acting_user(db: &Database, email: &str) -> Result<User> {
    db.ensure_user(email)
        .with_context(|| format!("Failed to resolve user {}", email))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool, email: &str) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let user = acting_user(&db, email)?;
    println!("   Local user: {} (id {})", user.email, user.id);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Track a subscription: subtrack subscriptions add Netflix --cost 15.99 --category Entertainment --next 2026-11-01");
    println!("  2. Start web UI: subtrack serve");

    Ok(())
}
