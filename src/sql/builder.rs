//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a table descriptor.
//! Identifiers come from the registry only; every value is a bound parameter.

use crate::config::{ColumnDescriptor, TableDescriptor};
use crate::sql::SqlParam;

/// Quote identifier for PostgreSQL (safe: only from registry).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Pushes a value and returns its placeholder with a cast to the column type.
    fn push_param(&mut self, column: &ColumnDescriptor, v: SqlParam) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), column.sql_type.cast())
    }

    /// WHERE clause over the primary key, binding `key` in declaration order.
    fn push_key_filter(&mut self, table: &TableDescriptor, key: Vec<SqlParam>) -> String {
        table
            .primary_key()
            .zip(key)
            .map(|(c, v)| {
                let ph = self.push_param(c, v);
                format!("{} = {}", quoted(c.name), ph)
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

fn column_list<'a>(columns: impl Iterator<Item = &'a ColumnDescriptor>) -> String {
    columns.map(|c| quoted(c.name)).collect::<Vec<_>>().join(", ")
}

/// SELECT every declared column, ordered by the first column.
pub fn select_all(table: &TableDescriptor) -> QueryBuf {
    let mut q = QueryBuf::new();
    let order = table.columns.first().map(|c| quoted(c.name)).unwrap_or_else(|| "1".into());
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(table.columns.iter()),
        quoted(table.name),
        order
    );
    q
}

/// SELECT one row by primary key. `key` holds one value per key column, in declaration order.
pub fn select_by_key(table: &TableDescriptor, key: Vec<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let filter = q.push_key_filter(table, key);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        column_list(table.columns.iter()),
        quoted(table.name),
        filter
    );
    q
}

/// INSERT one value per declared column, in declaration order.
pub fn insert(table: &TableDescriptor, values: Vec<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = table
        .columns
        .iter()
        .zip(values)
        .map(|(c, v)| q.push_param(c, v))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table.name),
        column_list(table.columns.iter()),
        placeholders.join(", ")
    );
    q
}

/// UPDATE every non-key column of the row matching `key`. `values` holds one value per
/// non-key column, in declaration order. Returns None when the table has no non-key columns.
pub fn update(table: &TableDescriptor, values: Vec<SqlParam>, key: Vec<SqlParam>) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = table
        .non_key_columns()
        .zip(values)
        .map(|(c, v)| {
            let ph = q.push_param(c, v);
            format!("{} = {}", quoted(c.name), ph)
        })
        .collect();
    if sets.is_empty() {
        return None;
    }
    let filter = q.push_key_filter(table, key);
    q.sql = format!("UPDATE {} SET {} WHERE {}", quoted(table.name), sets.join(", "), filter);
    Some(q)
}

/// DELETE the row matching `key`.
pub fn delete(table: &TableDescriptor, key: Vec<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let filter = q.push_key_filter(table, key);
    q.sql = format!("DELETE FROM {} WHERE {}", quoted(table.name), filter);
    q
}
