//! Stored routines exposed on the tools page.

use crate::error::AppError;
use crate::gateway::{QueryGateway, Row};
use crate::sql::SqlParam;
use chrono::NaiveDate;
use serde_json::Value;

const ADD_CASE_WITH_REPORT: &str =
    r#"CALL "Add_Case_With_Report"($1::text, $2::text, $3::text, $4::date, NULL, NULL)"#;
const GET_AGE: &str = "SELECT get_age($1::date) AS age";
const TOTAL_EVIDENCE: &str = "SELECT total_evidence($1::integer) AS total";
const SUSPECT_ALIASES: &str = r#"SELECT * FROM "Get_Suspect_Aliases"()"#;

/// Input of `Add_Case_With_Report`. Blank text fields are passed as NULL.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCase {
    pub title: Option<String>,
    pub description: Option<String>,
    pub report_content: Option<String>,
    pub report_date: NaiveDate,
}

/// Keys assigned by `Add_Case_With_Report`.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseIds {
    pub case_id: Value,
    pub report_id: Value,
}

impl CaseIds {
    fn from_row(row: Row) -> Option<Self> {
        let case_id = row.get("Case_ID").filter(|v| !v.is_null())?.clone();
        let report_id = row.get("Report_ID").filter(|v| !v.is_null())?.clone();
        Some(CaseIds { case_id, report_id })
    }
}

/// Parse a `YYYY-MM-DD` form field.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

pub fn parse_int(field: &str, value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse::<i32>()
        .map(i64::from)
        .map_err(|_| AppError::Validation(format!("{field} must be a whole number")))
}

pub struct Procedures;

impl Procedures {
    /// Creates a case and its first report in one database call. `None` when the call returned
    /// no identifiers.
    pub async fn add_case_with_report(gw: &QueryGateway, case: &NewCase) -> Result<Option<CaseIds>, AppError> {
        let params = [
            SqlParam::from(case.title.clone()),
            SqlParam::from(case.description.clone()),
            SqlParam::from(case.report_content.clone()),
            SqlParam::from(case.report_date),
        ];
        let row = gw.fetch_one(ADD_CASE_WITH_REPORT, &params).await?;
        Ok(row.and_then(CaseIds::from_row))
    }

    /// Age in whole years for a date of birth.
    pub async fn get_age(gw: &QueryGateway, dob: NaiveDate) -> Result<Value, AppError> {
        let row = gw.fetch_one(GET_AGE, &[SqlParam::from(dob)]).await?;
        Ok(scalar(row, "age"))
    }

    /// Evidence items linked to a case through its trials.
    pub async fn total_evidence(gw: &QueryGateway, case_id: i64) -> Result<Value, AppError> {
        let row = gw.fetch_one(TOTAL_EVIDENCE, &[SqlParam::from(case_id)]).await?;
        Ok(scalar(row, "total"))
    }

    /// Every suspect alias with the suspect's name.
    pub async fn suspect_aliases(gw: &QueryGateway) -> Result<Vec<Row>, AppError> {
        gw.fetch_all(SUSPECT_ALIASES, &[]).await
    }
}

fn scalar(row: Option<Row>, column: &str) -> Value {
    row.and_then(|mut r| r.remove(column)).unwrap_or(Value::Null)
}

/// Blank form fields become `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
