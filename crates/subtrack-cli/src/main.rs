//! SubTrack CLI - Subscription tracker and spending analyzer
//!
//! Usage:
//!   subtrack init                              Initialize database
//!   subtrack subscriptions add Netflix ...     Track a subscription
//!   subtrack report overview                   Monthly and yearly totals
//!   subtrack serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt, &cli.user),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                &cli.user,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UsersAction::Add {
                    email,
                    password,
                    name,
                } => commands::cmd_users_add(&db, &email, &password, name.as_deref()),
            }
        }
        Commands::Subscriptions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::acting_user(&db, &cli.user)?;
            match action {
                SubscriptionsAction::List { json } => {
                    commands::cmd_subscriptions_list(&db, user.id, json)
                }
                SubscriptionsAction::Add {
                    name,
                    cost,
                    cycle,
                    category,
                    next,
                    last_used,
                    notes,
                } => commands::cmd_subscriptions_add(
                    &db,
                    user.id,
                    commands::SubscriptionArgs {
                        name,
                        cost,
                        cycle,
                        category,
                        next,
                        last_used,
                        notes,
                    },
                ),
                SubscriptionsAction::Update {
                    id,
                    name,
                    cost,
                    cycle,
                    category,
                    next,
                    status,
                    notes,
                } => commands::cmd_subscriptions_update(
                    &db,
                    user.id,
                    id,
                    commands::SubscriptionChanges {
                        name,
                        cost,
                        cycle,
                        category,
                        next,
                        status,
                        notes,
                    },
                ),
                SubscriptionsAction::Used { id, date } => {
                    commands::cmd_subscriptions_used(&db, user.id, id, date.as_deref())
                }
                SubscriptionsAction::Remove { id } => {
                    commands::cmd_subscriptions_remove(&db, user.id, id)
                }
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::acting_user(&db, &cli.user)?;
            match action {
                SettingsAction::Show => commands::cmd_settings_show(&db, user.id),
                SettingsAction::Set {
                    email_notifications,
                    reminder_days,
                    unused_days,
                } => commands::cmd_settings_set(
                    &db,
                    user.id,
                    email_notifications,
                    reminder_days,
                    unused_days,
                ),
            }
        }
        Commands::Report { report } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let user = commands::acting_user(&db, &cli.user)?;
            match report {
                ReportType::Overview { json } => commands::cmd_report_overview(&db, user.id, json),
                ReportType::Categories { json } => {
                    commands::cmd_report_categories(&db, user.id, json)
                }
                ReportType::DeadWeight { json } => {
                    commands::cmd_report_dead_weight(&db, user.id, json)
                }
                ReportType::Trends { months, json } => {
                    commands::cmd_report_trends(&db, user.id, months, json)
                }
                ReportType::Recommendations { json } => {
                    commands::cmd_report_recommendations(&db, user.id, json)
                }
            }
        }
    }
}
