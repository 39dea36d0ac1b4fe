//! Query gateway: one pooled connection per call, one statement per call.

use crate::error::AppError;
use crate::sql::{QueryBuf, SqlParam};
use futures_util::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Connection, Either, PgConnection, PgPool, Postgres};

/// One result row: column name to value, in select-list order.
pub type Row = Map<String, Value>;

/// How many rows the caller expects back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fetch {
    One,
    All,
    None,
}

#[derive(Debug)]
pub enum QueryResult {
    Row(Option<Row>),
    Rows(Vec<Row>),
    /// Affected rows for data-modifying statements; rows read and discarded for `Fetch::None`.
    Count(u64),
}

impl QueryResult {
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryResult::Row(row) => row.into_iter().collect(),
            QueryResult::Rows(rows) => rows,
            QueryResult::Count(_) => Vec::new(),
        }
    }

    pub fn into_row(self) -> Option<Row> {
        match self {
            QueryResult::Row(row) => row,
            QueryResult::Rows(rows) => rows.into_iter().next(),
            QueryResult::Count(_) => None,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            QueryResult::Row(row) => row.is_some() as u64,
            QueryResult::Rows(rows) => rows.len() as u64,
            QueryResult::Count(n) => *n,
        }
    }
}

/// Statement class, from the leading keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Call,
    Modify,
}

impl StatementKind {
    pub fn of(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");
        if keyword.eq_ignore_ascii_case("select") || keyword.eq_ignore_ascii_case("with") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("call") {
            StatementKind::Call
        } else {
            StatementKind::Modify
        }
    }
}

#[derive(Clone)]
pub struct QueryGateway {
    pool: PgPool,
}

impl QueryGateway {
    pub fn new(pool: PgPool) -> Self {
        QueryGateway { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Executes one statement on a connection acquired for this call only. The connection goes
    /// back to the pool when the guard drops, on success and on error alike.
    pub async fn execute(&self, sql: &str, params: &[SqlParam], fetch: Fetch) -> Result<QueryResult, AppError> {
        let kind = StatementKind::of(sql);
        tracing::debug!(sql = %sql, params = ?params, ?kind, ?fetch, "query");
        let mut conn = self.pool.acquire().await.map_err(|e| log_db_error(sql, e))?;
        let result = match kind {
            StatementKind::Select => select(&mut conn, sql, params, fetch).await,
            StatementKind::Call => call(&mut conn, sql, params).await.map(|rows| match fetch {
                Fetch::One => QueryResult::Row(rows.into_iter().next()),
                Fetch::All | Fetch::None => QueryResult::Rows(rows),
            }),
            StatementKind::Modify => modify(&mut conn, sql, params).await.map(QueryResult::Count),
        };
        result.map_err(|e| log_db_error(sql, e))
    }

    pub async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, AppError> {
        Ok(self.execute(sql, params, Fetch::All).await?.into_rows())
    }

    pub async fn fetch_one(&self, sql: &str, params: &[SqlParam]) -> Result<Option<Row>, AppError> {
        Ok(self.execute(sql, params, Fetch::One).await?.into_row())
    }

    /// Runs a data-modifying statement and returns the affected-row count.
    pub async fn run(&self, q: &QueryBuf) -> Result<u64, AppError> {
        Ok(self.execute(&q.sql, &q.params, Fetch::None).await?.count())
    }
}

fn log_db_error(sql: &str, e: sqlx::Error) -> AppError {
    tracing::error!(sql = %sql, error = %e, "database error");
    AppError::Db(e)
}

fn bind_all<'q>(
    sql: &'q str,
    params: &[SqlParam],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    params
        .iter()
        .cloned()
        .fold(sqlx::query(sql), |q, p| q.bind(p))
}

async fn select(
    conn: &mut PgConnection,
    sql: &str,
    params: &[SqlParam],
    fetch: Fetch,
) -> Result<QueryResult, sqlx::Error> {
    Ok(match fetch {
        Fetch::One => QueryResult::Row(bind_all(sql, params).fetch_optional(&mut *conn).await?.map(|r| row_to_map(&r))),
        Fetch::All => QueryResult::Rows(bind_all(sql, params).fetch_all(&mut *conn).await?.iter().map(row_to_map).collect()),
        Fetch::None => QueryResult::Count(bind_all(sql, params).fetch_all(&mut *conn).await?.len() as u64),
    })
}

/// Runs a procedure call, collecting rows from every row-bearing result in order and draining
/// the rest, so the procedure has finished before the connection is released. Without
/// parameters the simple protocol is used, which can carry several result sets.
async fn call(conn: &mut PgConnection, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, sqlx::Error> {
    if !params.is_empty() {
        let rows = bind_all(sql, params).fetch_all(&mut *conn).await?;
        return Ok(rows.iter().map(row_to_map).collect());
    }
    let mut rows = Vec::new();
    let mut results = sqlx::raw_sql(sql).fetch_many(&mut *conn);
    while let Some(item) = results.try_next().await? {
        if let Either::Right(row) = item {
            rows.push(row_to_map(&row));
        }
    }
    Ok(rows)
}

async fn modify(conn: &mut PgConnection, sql: &str, params: &[SqlParam]) -> Result<u64, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let done = bind_all(sql, params).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(done.rows_affected())
}

pub fn row_to_map(row: &PgRow) -> Row {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, col.ordinal()));
    }
    map
}

fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}
