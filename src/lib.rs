//! Forensic console: role-gated web administration over a PostgreSQL forensic case schema.

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod gateway;
pub mod handlers;
pub mod procedures;
pub mod reports;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod views;

pub use auth::{ensure_users_table, CurrentUser, Role, UserStore};
pub use config::{Registry, Settings};
pub use error::{AppError, AuthError, ConfigError};
pub use gateway::{Fetch, QueryGateway, QueryResult, Row};
pub use routes::app;
pub use schema::{apply_forensic_schema, ensure_database_exists};
pub use service::CrudService;
pub use state::AppState;
