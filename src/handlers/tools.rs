//! Stored-routine tools. Every failure is flashed; the user lands back on `/tools`.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::handlers::{render, render_with};
use crate::procedures::{non_blank, parse_date, parse_int, NewCase, Procedures};
use crate::state::AppState;
use crate::views::{cell_text, report_page, tools_page};
use axum::{extract::State, response::Response, Form};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

const TOOLS: &str = "/tools";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCaseForm {
    pub case_title: Option<String>,
    pub case_desc: Option<String>,
    pub report_content: Option<String>,
    pub report_date: Option<String>,
}

impl AddCaseForm {
    fn into_case(self, today: NaiveDate) -> Result<NewCase, AppError> {
        let report_date = match non_blank(self.report_date.as_deref()) {
            Some(d) => parse_date("reportDate", &d)?,
            None => today,
        };
        Ok(NewCase {
            title: non_blank(self.case_title.as_deref()),
            description: non_blank(self.case_desc.as_deref()),
            report_content: non_blank(self.report_content.as_deref()),
            report_date,
        })
    }
}

#[derive(Deserialize)]
pub struct AgeForm {
    #[serde(default)]
    pub dob: String,
}

#[derive(Deserialize)]
pub struct CaseForm {
    #[serde(default)]
    pub case_id: String,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn tools(State(state): State<AppState>, user: CurrentUser, jar: SignedCookieJar) -> Response {
    let today = today().format("%Y-%m-%d").to_string();
    render(&state, jar, Some(&user), |chrome| tools_page(chrome, &today))
}

pub async fn add_case_with_report(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: SignedCookieJar,
    Form(form): Form<AddCaseForm>,
) -> Response {
    let outcome = match form.into_case(today()) {
        Ok(case) => Procedures::add_case_with_report(&state.gateway, &case).await,
        Err(e) => Err(e),
    };
    let flash = match outcome {
        Ok(Some(ids)) => {
            tracing::info!(case_id = %ids.case_id, report_id = %ids.report_id, "case added with report");
            Flash::ok(format!(
                "Case added successfully! Case_ID: {}, Report_ID: {}",
                cell_text(Some(&ids.case_id)),
                cell_text(Some(&ids.report_id))
            ))
        }
        Ok(None) => Flash::warning("Procedure executed, but no IDs returned."),
        Err(e) => Flash::error(format!("Error executing procedure: {}", e.flash_message())),
    };
    flash::redirect(jar, flash, TOOLS)
}

pub async fn get_age(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: SignedCookieJar,
    Form(form): Form<AgeForm>,
) -> Response {
    let outcome = match parse_date("dob", &form.dob) {
        Ok(dob) => Procedures::get_age(&state.gateway, dob).await,
        Err(e) => Err(e),
    };
    let flash = match outcome {
        Ok(age) => Flash::ok(format!("Age = {}", cell_text(Some(&age)))),
        Err(e) => Flash::error(e.flash_message()),
    };
    flash::redirect(jar, flash, TOOLS)
}

pub async fn total_evidence(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: SignedCookieJar,
    Form(form): Form<CaseForm>,
) -> Response {
    let outcome = match parse_int("case_id", &form.case_id) {
        Ok(case_id) => Procedures::total_evidence(&state.gateway, case_id)
            .await
            .map(|total| (case_id, total)),
        Err(e) => Err(e),
    };
    let flash = match outcome {
        Ok((case_id, total)) => Flash::ok(format!(
            "Total evidence for Case {} = {}",
            case_id,
            cell_text(Some(&total))
        )),
        Err(e) => Flash::error(e.flash_message()),
    };
    flash::redirect(jar, flash, TOOLS)
}

/// Lists every alias. A failure still renders the page, with an empty table.
pub async fn suspect_aliases(State(state): State<AppState>, user: CurrentUser, jar: SignedCookieJar) -> Response {
    let (rows, flash) = match Procedures::suspect_aliases(&state.gateway).await {
        Ok(rows) => {
            let flash = Flash::ok(format!("Retrieved {} suspect alias records", rows.len()));
            (rows, flash)
        }
        Err(e) => (
            Vec::new(),
            Flash::error(format!("Error executing Get_Suspect_Aliases: {}", e.flash_message())),
        ),
    };
    render_with(&state, jar, Some(&user), Some(flash), |chrome| {
        report_page(chrome, "Suspect aliases", &["Suspect_ID", "Name", "Alias"], &rows)
    })
}
