use super::{escape, layout, rows_table, Chrome};
use crate::gateway::Row;
use std::fmt::Write;

/// Summary figures for the landing page.
#[derive(Debug, Default)]
pub struct DashboardView {
    pub case_count: i64,
    pub evidence_by_type: Vec<Row>,
    pub investigator_load: Vec<Row>,
    pub lab_usage: Vec<Row>,
    pub cases_with_evidence: Vec<Row>,
}

pub fn dashboard_page(chrome: &Chrome<'_>, view: &DashboardView) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<div class="card"><strong>Total cases:</strong> {}</div>"#,
        view.case_count
    );
    section(&mut body, "Evidence by type", &["Evidence_Type", "Count"], &view.evidence_by_type);
    section(&mut body, "Investigator load (top 5)", &["Name", "Cases"], &view.investigator_load);
    section(&mut body, "Lab usage", &["Lab_Name", "Evidence_Count"], &view.lab_usage);
    section(&mut body, "Cases with evidence", &["Case_ID", "Title"], &view.cases_with_evidence);
    layout("Dashboard", chrome, &body)
}

fn section(body: &mut String, heading: &str, columns: &[&str], rows: &[Row]) {
    let _ = write!(body, "<h2>{}</h2>", escape(heading));
    body.push_str(&rows_table(columns, rows));
}

/// Page for one canned report: heading plus a read-only table.
pub fn report_page(chrome: &Chrome<'_>, title: &str, columns: &[&str], rows: &[Row]) -> String {
    layout(title, chrome, &rows_table(columns, rows))
}
