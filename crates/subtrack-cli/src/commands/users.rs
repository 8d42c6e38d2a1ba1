//! User account commands

use anyhow::{Context, Result};
use subtrack_core::db::Database;

pub fn cmd_users_add(
    db: &Database,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<()> {
    let user = db
        .create_user(email, password, name)
        .context("Failed to create user")?;

    println!("✅ Created user {} (id {})", user.email, user.id);
    println!("   Log in through POST /api/auth/login to get a token");

    Ok(())
}
