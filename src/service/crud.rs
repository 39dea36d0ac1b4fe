//! Generic CRUD over any registered table.

use crate::config::TableDescriptor;
use crate::error::AppError;
use crate::gateway::{QueryGateway, Row};
use crate::service::{RequestValidator, Submission, WriteMode};
use crate::sql::{delete, insert, select_all, select_by_key, update};

pub struct CrudService;

impl CrudService {
    /// All rows, ordered by the first column.
    pub async fn list(gw: &QueryGateway, table: &TableDescriptor) -> Result<Vec<Row>, AppError> {
        let q = select_all(table);
        gw.fetch_all(&q.sql, &q.params).await
    }

    /// The row whose key matches the submitted key values.
    pub async fn find(gw: &QueryGateway, table: &TableDescriptor, form: &Submission) -> Result<Option<Row>, AppError> {
        let q = select_by_key(table, form.key(table)?);
        gw.fetch_one(&q.sql, &q.params).await
    }

    /// Insert one row from a value per declared column. Returns affected rows.
    pub async fn create(gw: &QueryGateway, table: &TableDescriptor, form: &Submission) -> Result<u64, AppError> {
        RequestValidator::validate(table, form, WriteMode::Create)?;
        let q = insert(table, form.values(table.columns.iter()));
        gw.run(&q).await
    }

    /// Overwrite every non-key column of the row matching the submitted key. Returns affected rows.
    pub async fn update(gw: &QueryGateway, table: &TableDescriptor, form: &Submission) -> Result<u64, AppError> {
        let key = form.key(table)?;
        RequestValidator::validate(table, form, WriteMode::Update)?;
        let q = update(table, form.values(table.non_key_columns()), key)
            .ok_or_else(|| AppError::Validation(format!("Nothing to update: every column of {} is part of the key", table.name)))?;
        gw.run(&q).await
    }

    /// Delete the row matching the submitted key. Returns affected rows.
    pub async fn delete(gw: &QueryGateway, table: &TableDescriptor, form: &Submission) -> Result<u64, AppError> {
        let q = delete(table, form.key(table)?);
        gw.run(&q).await
    }
}
