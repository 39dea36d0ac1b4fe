//! Fixed report pages and the evidence audit log.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::handlers::render;
use crate::reports::{self, Report};
use crate::state::AppState;
use crate::views::{evidence_log_page, report_page};
use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::SignedCookieJar;

async fn show(state: AppState, user: CurrentUser, jar: SignedCookieJar, report: Report) -> Result<Response, AppError> {
    let rows = report.run(&state.gateway).await?;
    Ok(render(&state, jar, Some(&user), |chrome| {
        report_page(chrome, report.title, report.columns, &rows)
    }))
}

pub async fn cases_with_evidence(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    show(state, user, jar, reports::CASES_WITH_EVIDENCE).await
}

pub async fn evidence_by_case(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    show(state, user, jar, reports::EVIDENCE_BY_CASE).await
}

pub async fn investigator_workload(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    show(state, user, jar, reports::INVESTIGATOR_WORKLOAD).await
}

/// Latest 100 evidence changes recorded by the audit trigger.
pub async fn evidence_log(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let rows = reports::EVIDENCE_LOG.run(&state.gateway).await?;
    Ok(render(&state, jar, Some(&user), |chrome| evidence_log_page(chrome, &rows)))
}
