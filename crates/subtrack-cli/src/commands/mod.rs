//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, acting_user)
//! - `reports` - Analytics reports
//! - `serve` - Web server command
//! - `settings` - User settings commands
//! - `subscriptions` - Subscription management commands
//! - `users` - User account commands

pub mod core;
pub mod reports;
pub mod serve;
pub mod settings;
pub mod subscriptions;
pub mod users;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use settings::*;
pub use subscriptions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pretty-print a serializable value as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
