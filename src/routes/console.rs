//! Console routes: authentication, dashboard, generic table CRUD, reports and tools.

use crate::handlers::{analytics, auth, dashboard, table, tools};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn console_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/logout", get(auth::logout))
        .route("/", get(dashboard::dashboard))
        .route("/table/:name", get(table::list))
        .route("/table/:name/new", get(table::new_row))
        .route("/table/:name/create", post(table::create_row))
        .route("/table/:name/edit", get(table::edit_row))
        .route("/table/:name/update", post(table::update_row))
        .route("/table/:name/delete", post(table::delete_row))
        .route("/tools", get(tools::tools))
        .route("/tools/add_case_with_report", post(tools::add_case_with_report))
        .route("/tools/get_age", post(tools::get_age))
        .route("/tools/total_evidence", post(tools::total_evidence))
        .route("/tools/suspect_aliases", get(tools::suspect_aliases))
        .route("/evidence-log", get(analytics::evidence_log))
        .route("/analytics/cases-with-evidence", get(analytics::cases_with_evidence))
        .route("/analytics/evidence-by-case", get(analytics::evidence_by_case))
        .route("/analytics/investigator-workload", get(analytics::investigator_workload))
}
