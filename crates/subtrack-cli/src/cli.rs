//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SubTrack - Know what your subscriptions really cost
#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Self-hosted subscription tracker and spending analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "subtrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SUBTRACK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Email of the user the command acts as (created on first use)
    #[arg(long, default_value = "local@localhost", global = true)]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (only for local development!)
        ///
        /// Every request then acts as the --user account.
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files (built web UI) to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionsAction,
    },

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Spending analytics
    Report {
        #[command(subcommand)]
        report: ReportType,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a user with a password (for use with the web API)
    Add {
        /// Email address
        email: String,

        /// Password (at least 6 characters)
        #[arg(long)]
        password: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// List subscriptions, soonest renewal first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a subscription
    Add {
        /// Display name
        name: String,

        /// Cost of one billing cycle (e.g. 15.99)
        #[arg(long)]
        cost: String,

        /// Billing cycle: monthly, yearly, weekly, quarterly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Category label
        #[arg(long)]
        category: String,

        /// Next billing date (YYYY-MM-DD)
        #[arg(long)]
        next: String,

        /// Last date the service was used (YYYY-MM-DD)
        #[arg(long)]
        last_used: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change fields of a subscription
    Update {
        /// Subscription ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        cost: Option<String>,

        #[arg(long)]
        cycle: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Next billing date (YYYY-MM-DD)
        #[arg(long)]
        next: Option<String>,

        /// Status: active, paused, cancelled
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Record that a subscription was used
    Used {
        /// Subscription ID
        id: i64,

        /// Date of use (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a subscription
    Remove {
        /// Subscription ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// Send renewal reminder emails
        #[arg(long)]
        email_notifications: Option<bool>,

        /// Days before renewal to remind
        #[arg(long)]
        reminder_days: Option<i64>,

        /// Days without use before a subscription counts as dead weight
        #[arg(long)]
        unused_days: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Monthly and yearly totals plus upcoming renewals
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly spend per category
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Subscriptions that have gone unused
    DeadWeight {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly spending over recent months
    Trends {
        /// Number of months to show
        #[arg(short, long, default_value = "6")]
        months: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ranked savings suggestions
    Recommendations {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
