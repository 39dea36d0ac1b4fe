//! Submission validation from column descriptors.

use crate::config::{ColumnDescriptor, SqlType, TableDescriptor};
use crate::error::AppError;
use crate::service::Submission;
use chrono::NaiveDate;

/// Which columns a write touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate the columns written by `mode`: non-nullable columns must be present, non-blank
    /// values must fit the column type. On update, key values are format-checked too.
    pub fn validate(table: &TableDescriptor, form: &Submission, mode: WriteMode) -> Result<(), AppError> {
        for c in &table.columns {
            let written = match mode {
                WriteMode::Create => true,
                WriteMode::Update => !c.primary_key,
            };
            if written && !c.nullable && !form.has_value(c.name) {
                return Err(AppError::Validation(format!("{} is required", c.name)));
            }
            if let Some(v) = form.get(c.name) {
                validate_field(c, v)?;
            }
        }
        Ok(())
    }
}

fn validate_field(c: &ColumnDescriptor, v: &str) -> Result<(), AppError> {
    let v = v.trim();
    if v.is_empty() {
        return Ok(());
    }
    match c.sql_type {
        SqlType::Integer => {
            if v.parse::<i32>().is_err() {
                return Err(AppError::Validation(format!("{} must be a whole number", c.name)));
            }
        }
        SqlType::Date => {
            if NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() {
                return Err(AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", c.name)));
            }
        }
        SqlType::Text => {}
    }
    Ok(())
}
