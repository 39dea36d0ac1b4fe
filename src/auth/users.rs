//! `users` table: DDL, lookups, signup and the admin bootstrap.

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::Role;
use crate::error::{AppError, AuthError};
use regex::Regex;
use sqlx::PgPool;
use std::sync::OnceLock;

#[derive(Clone, Debug)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: i32,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRecord> for User {
    type Error = AuthError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
            role: r.role.parse()?,
        })
    }
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.@-]{1,100}$").expect("static regex"))
}

pub fn is_valid_username(username: &str) -> bool {
    username_re().is_match(username)
}

/// Create `users` if absent.
pub async fn ensure_users_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(100) UNIQUE NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            role TEXT NOT NULL DEFAULT 'readonly' CHECK (role IN ('admin', 'readonly'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub struct UserStore;

impl UserStore {
    pub async fn by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRecord> =
            sqlx::query_as("SELECT id, username, password_hash, role FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    /// The user whose stored hash verifies `password`; [`AuthError::InvalidCredentials`] otherwise.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, AppError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }
        let user = Self::by_username(pool, username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await {
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(user)
    }

    /// Register a new account. An existing username is never modified.
    pub async fn create(pool: &PgPool, username: &str, password: &str, role: Role) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }
        if !is_valid_username(username) {
            return Err(AuthError::InvalidUsername.into());
        }
        if Self::by_username(pool, username).await?.is_some() {
            return Err(AuthError::UsernameTaken.into());
        }
        let password_hash = hash_password_blocking(password.to_string()).await?;
        let inserted: Result<UserRecord, sqlx::Error> = sqlx::query_as(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, role",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await;
        match inserted {
            Ok(r) => Ok(User::try_from(r)?),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AuthError::UsernameTaken.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Create the admin account when no account with `username` exists. Returns whether a row
    /// was inserted; a second call is a no-op.
    pub async fn bootstrap_admin(pool: &PgPool, username: &str, password: &str) -> Result<bool, AppError> {
        if !is_valid_username(username) {
            return Err(AuthError::InvalidUsername.into());
        }
        if Self::by_username(pool, username).await?.is_some() {
            return Ok(false);
        }
        let password_hash = hash_password_blocking(password.to_string()).await?;
        let done = sqlx::query(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, 'admin') \
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(&password_hash)
        .execute(pool)
        .await?;
        let created = done.rows_affected() == 1;
        if created {
            tracing::info!(username = %username, "bootstrapped admin account");
        }
        Ok(created)
    }
}
