//! Accounts, roles, password hashing and the session identity.

pub mod password;
pub mod session;
pub mod users;

pub use session::{CurrentUser, SESSION_COOKIE};
pub use users::{ensure_users_table, User, UserStore};

use crate::error::AuthError;
use std::fmt;
use std::str::FromStr;

/// Authorization level of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    #[default]
    ReadOnly,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ReadOnly => "readonly",
        }
    }

    /// Whether the role may create, update or delete rows.
    pub fn can_write(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "readonly" => Ok(Role::ReadOnly),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}
