//! User operations

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Stored in place of a hash for users that can only act locally
const NO_PASSWORD: &str = "!";

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

type UserRow = (i64, String, Option<String>, String);

fn user_from_row(row: UserRow) -> Result<User> {
    let (id, email, name, created_at) = row;
    Ok(User {
        id,
        email,
        name,
        created_at: parse_datetime(&created_at)?,
    })
}

impl Database {
    /// Register a user with a password and default settings
    pub fn create_user(&self, email: &str, password: &str, name: Option<&str>) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(Error::InvalidData(
                "Email and password are required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidData(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let hash = hash_password(password)?;
        let id = self.insert_user(&email, &hash, name)?;
        info!(user_id = id, "User registered");

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    fn insert_user(&self, email: &str, password_hash: &str, name: Option<&str>) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::AlreadyExists("User already exists".to_string()));
        }

        tx.execute(
            "INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)",
            params![email, password_hash, name],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute("INSERT INTO user_settings (user_id) VALUES (?)", params![id])?;
        tx.commit()?;

        Ok(id)
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row: Option<UserRow> = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        row.map(user_from_row).transpose()
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row: Option<UserRow> = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE email = ?",
                params![normalize_email(email)],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        row.map(user_from_row).transpose()
    }

    /// Check credentials, returning the user on success
    ///
    /// Unknown email and wrong password produce the same error.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || Error::Auth("Invalid email or password".to_string());

        let conn = self.conn()?;
        let found: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?",
                params![normalize_email(email)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        drop(conn);

        let (id, stored) = found.ok_or_else(invalid)?;
        if stored == NO_PASSWORD {
            debug!(user_id = id, "Password login attempted for local-only user");
            return Err(invalid());
        }

        let parsed = PasswordHash::new(&stored)
            .map_err(|e| Error::InvalidData(format!("Stored password hash: {}", e)))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        self.get_user(id)?.ok_or_else(invalid)
    }

    /// Fetch a user by email, creating a local-only one if missing
    ///
    /// Local-only users cannot log in with a password; they exist so the CLI
    /// and unauthenticated server mode have an owner for their data.
    pub fn ensure_user(&self, email: &str) -> Result<User> {
        if let Some(user) = self.get_user_by_email(email)? {
            return Ok(user);
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(Error::InvalidData("Email is required".to_string()));
        }

        let id = self.insert_user(&email, NO_PASSWORD, None)?;
        info!(user_id = id, "Created local user");
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }
}
