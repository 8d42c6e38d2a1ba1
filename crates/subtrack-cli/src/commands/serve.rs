//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use subtrack_server::{ServerConfig, ALLOWED_ORIGINS_ENV, JWT_SECRET_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    local_user: &str,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting SubTrack web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let mut config = ServerConfig::from_env(!no_auth);
    config.local_user_email = local_user.to_string();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        println!("   👤 Acting as: {}", config.local_user_email);
    } else if config.jwt_secret.is_empty() {
        anyhow::bail!(
            "Set {} to enable bearer token authentication, or pass --no-auth for local use",
            JWT_SECRET_ENV
        );
    } else {
        println!(
            "   🔒 Authentication: bearer tokens ({} day lifetime)",
            config.token_ttl_days
        );
    }
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    subtrack_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
