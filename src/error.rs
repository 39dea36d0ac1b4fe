//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("table {table} declares no primary key")]
    MissingPrimaryKey { table: String },
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("duplicate column: {table}.{column}")]
    DuplicateColumn { table: String, column: String },
    #[error("primary key column {table}.{column} must not be nullable")]
    NullablePrimaryKey { table: String, column: String },
    #[error("environment variable {name}: {message}")]
    Env { name: &'static str, message: String },
}

/// Credential and account failures. Recovered at the route with a flash message.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Username may only contain letters, digits and . _ @ - (max 100)")]
    InvalidUsername,
    #[error("Unknown role: {0}")]
    InvalidRole(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("{0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Message for a flash banner. Database errors show the server's message without the
    /// "database:" prefix.
    pub fn flash_message(&self) -> String {
        match self {
            AppError::Db(sqlx::Error::Database(e)) => e.message().to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(AuthError::Hash(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::UnknownTable(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, Html(crate::views::error_page(status, &message))).into_response()
    }
}
