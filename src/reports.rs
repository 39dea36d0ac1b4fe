//! Canned read-only report queries.

use crate::error::AppError;
use crate::gateway::{QueryGateway, Row};
use crate::views::DashboardView;

/// A fixed query plus the columns it renders, in order.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    pub title: &'static str,
    pub columns: &'static [&'static str],
    pub sql: &'static str,
}

impl Report {
    pub async fn run(&self, gw: &QueryGateway) -> Result<Vec<Row>, AppError> {
        tracing::debug!(report = %self.title, "running report");
        gw.fetch_all(self.sql, &[]).await
    }
}

pub const CASES_WITH_EVIDENCE: Report = Report {
    title: "Cases with any evidence",
    columns: &["Case_ID", "Title"],
    sql: r#"SELECT c."Case_ID", c."Title"
FROM "Case_" c
WHERE EXISTS (
  SELECT 1 FROM "Trial" t JOIN "Evidence" e ON e."Evidence_ID" = t."Evidence_ID"
  WHERE t."Case_ID" = c."Case_ID"
)
ORDER BY c."Case_ID""#,
};

pub const EVIDENCE_BY_CASE: Report = Report {
    title: "Evidence count by case",
    columns: &["Case_ID", "Title", "Evidence_Count"],
    sql: r#"SELECT c."Case_ID", c."Title", COUNT(t."Evidence_ID") AS "Evidence_Count"
FROM "Case_" c
LEFT JOIN "Trial" t ON t."Case_ID" = c."Case_ID"
GROUP BY c."Case_ID", c."Title"
ORDER BY "Evidence_Count" DESC, c."Case_ID""#,
};

pub const INVESTIGATOR_WORKLOAD: Report = Report {
    title: "Investigator workload",
    columns: &["Investigator_ID", "Name", "Case_Count"],
    sql: r#"SELECT i."Investigator_ID", i."Name", COUNT(a."Case_ID") AS "Case_Count"
FROM "Investigator" i
LEFT JOIN "Assigned" a ON a."Investigator_ID" = i."Investigator_ID"
GROUP BY i."Investigator_ID", i."Name"
ORDER BY "Case_Count" DESC, i."Name""#,
};

pub const EVIDENCE_LOG: Report = Report {
    title: "Evidence log",
    columns: &["Log_ID", "Evidence_ID", "Action", "Log_Time", "Evidence_Type", "Description"],
    sql: r#"SELECT el."Log_ID", el."Evidence_ID", el."Action", el."Log_Time",
       e."Evidence_Type", e."Description"
FROM "Evidence_Log" el
LEFT JOIN "Evidence" e ON e."Evidence_ID" = el."Evidence_ID"
ORDER BY el."Log_Time" DESC, el."Log_ID" DESC
LIMIT 100"#,
};

const CASE_COUNT: &str = r#"SELECT COUNT(*) AS "Count" FROM "Case_""#;

const EVIDENCE_BY_TYPE: &str = r#"SELECT e."Evidence_Type", COUNT(*) AS "Count"
FROM "Evidence" e
GROUP BY e."Evidence_Type"
ORDER BY "Count" DESC, e."Evidence_Type""#;

const INVESTIGATOR_LOAD: &str = r#"SELECT i."Name", COUNT(a."Case_ID") AS "Cases"
FROM "Investigator" i
LEFT JOIN "Assigned" a ON a."Investigator_ID" = i."Investigator_ID"
GROUP BY i."Investigator_ID", i."Name"
ORDER BY "Cases" DESC, i."Name"
LIMIT 5"#;

const LAB_USAGE: &str = r#"SELECT l."Lab_Name", COUNT(e."Evidence_ID") AS "Evidence_Count"
FROM "Lab" l
LEFT JOIN "Evidence" e ON e."Lab_ID" = l."Lab_ID"
GROUP BY l."Lab_ID", l."Lab_Name"
ORDER BY "Evidence_Count" DESC, l."Lab_Name""#;

/// Every dashboard figure. The queries run concurrently, one pooled connection each.
pub async fn dashboard(gw: &QueryGateway) -> Result<DashboardView, AppError> {
    let cases = CASES_WITH_EVIDENCE;
    let (count, evidence_by_type, investigator_load, lab_usage, cases_with_evidence) = tokio::try_join!(
        gw.fetch_one(CASE_COUNT, &[]),
        gw.fetch_all(EVIDENCE_BY_TYPE, &[]),
        gw.fetch_all(INVESTIGATOR_LOAD, &[]),
        gw.fetch_all(LAB_USAGE, &[]),
        cases.run(gw),
    )?;
    let case_count = count
        .as_ref()
        .and_then(|row| row.get("Count"))
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    Ok(DashboardView {
        case_count,
        evidence_by_type,
        investigator_load,
        lab_usage,
        cases_with_evidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StatementKind;

    #[test]
    fn reports_are_plain_selects() {
        for r in [CASES_WITH_EVIDENCE, EVIDENCE_BY_CASE, INVESTIGATOR_WORKLOAD, EVIDENCE_LOG] {
            assert_eq!(StatementKind::of(r.sql), StatementKind::Select, "{}", r.title);
        }
        for sql in [CASE_COUNT, EVIDENCE_BY_TYPE, INVESTIGATOR_LOAD, LAB_USAGE] {
            assert_eq!(StatementKind::of(sql), StatementKind::Select);
        }
    }

    #[test]
    fn evidence_by_case_orders_by_count_then_case() {
        assert!(EVIDENCE_BY_CASE
            .sql
            .ends_with(r#"ORDER BY "Evidence_Count" DESC, c."Case_ID""#));
        assert!(EVIDENCE_BY_CASE.sql.contains("LEFT JOIN"));
    }

    #[test]
    fn report_columns_match_select_aliases() {
        for r in [CASES_WITH_EVIDENCE, EVIDENCE_BY_CASE, INVESTIGATOR_WORKLOAD, EVIDENCE_LOG] {
            for c in r.columns {
                assert!(r.sql.contains(&format!("\"{c}\"")), "{} lacks {c}", r.title);
            }
        }
    }
}
