//! HTTP handlers: authentication, dashboard, generic table CRUD, reports and tools.

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod table;
pub mod tools;

use crate::auth::CurrentUser;
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::views::Chrome;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;

/// Render a full page, consuming the pending flash from the cookie jar.
pub(crate) fn render<F>(state: &AppState, jar: SignedCookieJar, user: Option<&CurrentUser>, body: F) -> Response
where
    F: FnOnce(&Chrome<'_>) -> String,
{
    render_with(state, jar, user, None, body)
}

/// Like [`render`], showing `immediate` instead of any pending flash.
pub(crate) fn render_with<F>(
    state: &AppState,
    jar: SignedCookieJar,
    user: Option<&CurrentUser>,
    immediate: Option<Flash>,
    body: F,
) -> Response
where
    F: FnOnce(&Chrome<'_>) -> String,
{
    let (jar, pending) = flash::take(jar);
    let chrome = Chrome {
        user,
        flash: immediate.or(pending),
        tables: state.table_names(),
    };
    (jar, Html(body(&chrome))).into_response()
}
