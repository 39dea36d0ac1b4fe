//! Submitted form values for a registered table.

use crate::config::{ColumnDescriptor, TableDescriptor};
use crate::error::AppError;
use crate::sql::SqlParam;
use std::collections::HashMap;

/// Raw `name=value` pairs from a query string or urlencoded body.
#[derive(Clone, Debug, Default)]
pub struct Submission(HashMap<String, String>);

impl Submission {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether the field was submitted with a non-blank value.
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
    }

    /// One parameter per column, in the given order; blank or missing fields become NULL.
    pub fn values<'a>(&self, columns: impl Iterator<Item = &'a ColumnDescriptor>) -> Vec<SqlParam> {
        columns.map(|c| SqlParam::from_form(self.get(c.name))).collect()
    }

    /// Primary-key values in declaration order. Every key column must be present.
    pub fn key(&self, table: &TableDescriptor) -> Result<Vec<SqlParam>, AppError> {
        table
            .primary_key()
            .map(|c| match self.get(c.name) {
                Some(v) if !v.trim().is_empty() => Ok(SqlParam::Text(v.to_string())),
                _ => Err(AppError::Validation(format!("Missing value for key column {}", c.name))),
            })
            .collect()
    }
}

impl From<HashMap<String, String>> for Submission {
    fn from(values: HashMap<String, String>) -> Self {
        Submission(values)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Submission {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Submission(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}
