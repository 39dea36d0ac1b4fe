//! Runtime settings from the process environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

pub const DEFAULT_SESSION_SECRET: &str = "dev-secret";

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// Full connection URL. When set, the individual parts below are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub pool_size: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(|e| ConfigError::Env {
                name: "DATABASE_URL",
                message: e.to_string(),
            });
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub bind_addr: String,
    /// Create the forensic tables and routines on startup when missing.
    pub bootstrap_schema: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port = match get("DB_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|e| ConfigError::Env {
                name: "DB_PORT",
                message: e.to_string(),
            })?,
            None => 5432,
        };
        let pool_size = match get("DB_POOL_SIZE") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Env {
                        name: "DB_POOL_SIZE",
                        message: "must be greater than zero".into(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Env {
                        name: "DB_POOL_SIZE",
                        message: e.to_string(),
                    })
                }
            },
            None => 10,
        };
        let bootstrap_schema = match get("BOOTSTRAP_SCHEMA").as_deref().map(str::trim) {
            None => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(ConfigError::Env {
                    name: "BOOTSTRAP_SCHEMA",
                    message: format!("expected true or false, got '{}'", v),
                })
            }
        };

        Ok(Settings {
            database: DatabaseSettings {
                url: get("DATABASE_URL"),
                host: or("DB_HOST", "127.0.0.1"),
                port,
                user: or("DB_USER", "postgres"),
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                name: or("DB_NAME", "fe_db"),
                pool_size,
            },
            session_secret: or("SESSION_SECRET", DEFAULT_SESSION_SECRET),
            admin_username: or("ADMIN_USERNAME", "admin"),
            admin_password: or("ADMIN_PASSWORD", "admin123"),
            bind_addr: or("BIND_ADDR", "127.0.0.1:5000"),
            bootstrap_schema,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database.host, "127.0.0.1");
        assert_eq!(s.database.port, 5432);
        assert_eq!(s.database.name, "fe_db");
        assert_eq!(s.database.pool_size, 10);
        assert_eq!(s.admin_username, "admin");
        assert_eq!(s.admin_password, "admin123");
        assert!(s.uses_default_secret());
        assert!(!s.bootstrap_schema);
        assert!(s.database.url.is_none());
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_POOL_SIZE", "3"),
            ("SESSION_SECRET", "s3cret"),
            ("ADMIN_USERNAME", "root"),
            ("BOOTSTRAP_SCHEMA", "TRUE"),
        ])
        .unwrap();
        assert_eq!(s.database.host, "db");
        assert_eq!(s.database.port, 6543);
        assert_eq!(s.database.pool_size, 3);
        assert_eq!(s.admin_username, "root");
        assert!(!s.uses_default_secret());
        assert!(s.bootstrap_schema);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let s = settings(&[("DB_HOST", ""), ("ADMIN_PASSWORD", "  ")]).unwrap();
        assert_eq!(s.database.host, "127.0.0.1");
        assert_eq!(s.admin_password, "admin123");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(matches!(settings(&[("DB_PORT", "abc")]), Err(ConfigError::Env { name: "DB_PORT", .. })));
        assert!(matches!(
            settings(&[("DB_POOL_SIZE", "0")]),
            Err(ConfigError::Env { name: "DB_POOL_SIZE", .. })
        ));
        assert!(matches!(
            settings(&[("BOOTSTRAP_SCHEMA", "maybe")]),
            Err(ConfigError::Env { name: "BOOTSTRAP_SCHEMA", .. })
        ));
    }

    #[test]
    fn database_url_takes_precedence() {
        let s = settings(&[("DATABASE_URL", "postgres://u:p@localhost:5433/cases")]).unwrap();
        let opts = s.database.connect_options().unwrap();
        assert_eq!(opts.get_port(), 5433);
        assert_eq!(opts.get_database(), Some("cases"));
    }
}
