//! Server-rendered HTML pages.

mod auth;
mod dashboard;
mod tables;
mod tools;

pub use auth::{login_page, signup_page};
pub use dashboard::{dashboard_page, report_page, DashboardView};
pub use tables::{form_page, table_page, FormTarget, TableView};
pub use tools::{evidence_log_page, tools_page};

use crate::auth::CurrentUser;
use crate::flash::Flash;
use crate::gateway::Row;
use axum::http::StatusCode;
use serde_json::Value;
use std::fmt::Write;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Display text of a cell; NULL renders empty.
pub fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Everything around the page body: signed-in user, pending flash, navigation.
pub struct Chrome<'a> {
    pub user: Option<&'a CurrentUser>,
    pub flash: Option<Flash>,
    pub tables: Vec<&'static str>,
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f9fafb;color:#1f2937}\
nav{background:#1e293b;padding:.75rem 1.5rem;display:flex;flex-wrap:wrap;gap:.75rem;align-items:center}\
nav a{color:#e2e8f0;text-decoration:none;font-size:.9rem}nav .who{margin-left:auto;color:#94a3b8;font-size:.85rem}\
main{padding:1.5rem}.flash{padding:.75rem 1rem;border-radius:6px;margin-bottom:1rem}\
.flash.ok{background:#d1fae5;color:#065f46}.flash.warning{background:#fef3c7;color:#92400e}\
.flash.error{background:#fee2e2;color:#991b1b}table{border-collapse:collapse;width:100%;background:#fff;margin-bottom:1.5rem}\
th,td{padding:.5rem .75rem;border-bottom:1px solid #e5e7eb;text-align:left;font-size:.9rem}\
th{background:#f3f4f6}form.inline{display:inline}.card{background:#fff;border:1px solid #e5e7eb;border-radius:8px;padding:1rem 1.25rem;margin-bottom:1.25rem}\
label{display:block;margin:.5rem 0 .25rem;font-weight:600;font-size:.85rem}input,select,textarea{padding:.4rem;min-width:18rem}\
button,.button{padding:.4rem .9rem;background:#4f46e5;color:#fff;border:none;border-radius:4px;text-decoration:none;cursor:pointer}\
button.danger{background:#dc2626}.badge{font-size:.75rem;background:#e5e7eb;padding:.15rem .5rem;border-radius:8px}";

pub fn layout(title: &str, chrome: &Chrome<'_>, body: &str) -> String {
    let mut nav = String::new();
    if let Some(user) = chrome.user {
        nav.push_str(r#"<a href="/">Dashboard</a>"#);
        for t in &chrome.tables {
            let _ = write!(nav, r#"<a href="/table/{0}">{0}</a>"#, escape(t));
        }
        nav.push_str(concat!(
            r#"<a href="/tools">Tools</a><a href="/evidence-log">Evidence log</a>"#,
            r#"<a href="/analytics/cases-with-evidence">Cases with evidence</a>"#,
            r#"<a href="/analytics/evidence-by-case">Evidence by case</a>"#,
            r#"<a href="/analytics/investigator-workload">Investigator workload</a>"#,
        ));
        let _ = write!(
            nav,
            r#"<span class="who">{} ({}) · <a href="/logout">Log out</a></span>"#,
            escape(&user.username),
            user.role
        );
    } else {
        nav.push_str(r#"<a href="/login">Log in</a><a href="/signup">Sign up</a>"#);
    }
    let flash = chrome
        .flash
        .as_ref()
        .map(|f| format!(r#"<div class="flash {}">{}</div>"#, f.kind.as_str(), escape(&f.message)))
        .unwrap_or_default();
    format!(
        r#"<!doctype html><html><head><meta charset="utf-8"/><title>{title} · Forensic Console</title><style>{STYLE}</style></head><body><nav>{nav}</nav><main>{flash}<h1>{title}</h1>{body}</main></body></html>"#,
        title = escape(title),
        STYLE = STYLE,
        nav = nav,
        flash = flash,
        body = body,
    )
}

/// Read-only table of `rows` over `columns`.
pub fn rows_table(columns: &[&str], rows: &[Row]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for c in columns {
        let _ = write!(html, "<th>{}</th>", escape(c));
    }
    html.push_str("</tr></thead><tbody>");
    if rows.is_empty() {
        let _ = write!(html, r#"<tr><td colspan="{}"><em>No rows</em></td></tr>"#, columns.len().max(1));
    }
    for row in rows {
        html.push_str("<tr>");
        for c in columns {
            let _ = write!(html, "<td>{}</td>", escape(&cell_text(row.get(*c))));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let chrome = Chrome {
        user: None,
        flash: None,
        tables: Vec::new(),
    };
    let body = format!(
        r#"<p>{}</p><p><a href="/">Back to the dashboard</a></p>"#,
        escape(message)
    );
    layout(&status.to_string(), &chrome, &body)
}
