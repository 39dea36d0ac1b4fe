//! Generic CRUD pages for every registered table. Writes require the admin role.

use crate::auth::CurrentUser;
use crate::config::TableDescriptor;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::handlers::render;
use crate::service::{CrudService, Submission};
use crate::state::AppState;
use crate::views::{form_page, table_page, FormTarget, TableView};
use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use std::collections::HashMap;

fn list_url(table: &TableDescriptor) -> String {
    format!("/table/{}", table.name)
}

fn unknown_table(jar: SignedCookieJar, err: AppError) -> Response {
    tracing::warn!(error = %err, "unknown table");
    flash::redirect(jar, Flash::error("Unknown table"), "/")
}

/// Write bodies are decoded after the role check.
type FormBody = Result<Form<HashMap<String, String>>, FormRejection>;

/// Flash `message` and return to the table list when `user` may not write.
fn deny_readonly(
    jar: SignedCookieJar,
    user: &CurrentUser,
    table: &TableDescriptor,
    message: &str,
) -> Result<SignedCookieJar, Response> {
    if user.is_readonly() {
        tracing::warn!(username = %user.username, table = %table.name, "write denied for read-only user");
        return Err(flash::redirect(jar, Flash::error(message), &list_url(table)));
    }
    Ok(jar)
}

/// Flash the outcome of a write and return to the table list.
fn finish(jar: SignedCookieJar, table: &TableDescriptor, done: &str, outcome: Result<u64, AppError>) -> Response {
    let flash = match outcome {
        Ok(0) => Flash::warning("No matching row"),
        Ok(_) => Flash::ok(done),
        Err(e) => {
            tracing::warn!(table = %table.name, error = %e, "write failed");
            Flash::error(e.flash_message())
        }
    };
    flash::redirect(jar, flash, &list_url(table))
}

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return Ok(unknown_table(jar, e)),
    };
    let rows = CrudService::list(&state.gateway, table).await?;
    let view = TableView {
        table,
        rows: &rows,
        can_write: !user.is_readonly(),
    };
    Ok(render(&state, jar, Some(&user), |chrome| table_page(chrome, &view)))
}

pub async fn new_row(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
) -> Response {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return unknown_table(jar, e),
    };
    let jar = match deny_readonly(jar, &user, table, "Read-only users cannot add data") {
        Ok(jar) => jar,
        Err(denied) => return denied,
    };
    render(&state, jar, Some(&user), |chrome| {
        form_page(chrome, table, FormTarget::Create, None)
    })
}

pub async fn create_row(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
    body: FormBody,
) -> Response {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return unknown_table(jar, e),
    };
    let jar = match deny_readonly(jar, &user, table, "Permission denied") {
        Ok(jar) => jar,
        Err(denied) => return denied,
    };
    let Form(values) = match body {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };
    let outcome = CrudService::create(&state.gateway, table, &Submission::from(values)).await;
    finish(jar, table, "Created", outcome)
}

pub async fn edit_row(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
    Query(key): Query<HashMap<String, String>>,
) -> Response {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return unknown_table(jar, e),
    };
    let jar = match deny_readonly(jar, &user, table, "Read-only users cannot edit data") {
        Ok(jar) => jar,
        Err(denied) => return denied,
    };
    match CrudService::find(&state.gateway, table, &Submission::from(key)).await {
        Ok(Some(row)) => render(&state, jar, Some(&user), |chrome| {
            form_page(chrome, table, FormTarget::Update, Some(&row))
        }),
        Ok(None) => flash::redirect(jar, Flash::error("Row not found"), &list_url(table)),
        Err(e) => flash::redirect(jar, Flash::error(e.flash_message()), &list_url(table)),
    }
}

pub async fn update_row(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
    body: FormBody,
) -> Response {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return unknown_table(jar, e),
    };
    let jar = match deny_readonly(jar, &user, table, "Permission denied") {
        Ok(jar) => jar,
        Err(denied) => return denied,
    };
    let Form(values) = match body {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };
    let outcome = CrudService::update(&state.gateway, table, &Submission::from(values)).await;
    finish(jar, table, "Updated", outcome)
}

pub async fn delete_row(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
    Path(name): Path<String>,
    body: FormBody,
) -> Response {
    let table = match state.registry.table(&name) {
        Ok(table) => table,
        Err(e) => return unknown_table(jar, e),
    };
    let jar = match deny_readonly(jar, &user, table, "Permission denied") {
        Ok(jar) => jar,
        Err(denied) => return denied,
    };
    let Form(key) = match body {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };
    let outcome = CrudService::delete(&state.gateway, table, &Submission::from(key)).await;
    finish(jar, table, "Deleted", outcome)
}
