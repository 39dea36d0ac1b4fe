//! Optional bootstrap of the forensic schema: registry tables, auxiliary tables, trigger and routines.
//! Tables are created in registry order, which already satisfies foreign-key dependencies.

use crate::config::{DatabaseSettings, Registry, TableDescriptor};
use crate::error::AppError;
use crate::sql::quoted;
use sqlx::{ConnectOptions, PgPool};

const ROUTINES: &str = include_str!("../sql/routines.sql");

/// `CREATE TABLE IF NOT EXISTS` for one descriptor, with its primary key and foreign keys inline.
pub fn create_table_sql(table: &TableDescriptor) -> String {
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quoted(c.name), c.sql_type.ddl());
            if !c.nullable {
                def.push_str(" NOT NULL");
            }
            if let Some(fk) = c.references {
                def.push_str(&format!(" REFERENCES {} ({})", quoted(fk.table), quoted(fk.column)));
            }
            def
        })
        .collect();
    let pk: Vec<String> = table.primary_key().map(|c| quoted(c.name)).collect();
    defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(table.name),
        defs.join(",\n  ")
    )
}

/// Create every registered table, then the auxiliary tables and routines. Safe to repeat.
pub async fn apply_forensic_schema(pool: &PgPool, registry: &Registry) -> Result<(), AppError> {
    for table in registry.tables() {
        sqlx::query(&create_table_sql(table)).execute(pool).await?;
    }
    sqlx::raw_sql(ROUTINES).execute(pool).await?;
    tracing::info!(tables = registry.tables().len(), "forensic schema ready");
    Ok(())
}

/// Create the configured database when it does not exist yet, connecting through `postgres`.
pub async fn ensure_database_exists(db: &DatabaseSettings) -> Result<(), AppError> {
    let opts = db.connect_options()?;
    let name = opts.get_database().unwrap_or("postgres").to_string();
    if name == "postgres" {
        return Ok(());
    }
    let mut conn = opts.database("postgres").connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %name, "created database");
    }
    Ok(())
}
