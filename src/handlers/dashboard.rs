use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::handlers::render;
use crate::reports;
use crate::state::AppState;
use crate::views::dashboard_page;
use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::SignedCookieJar;

pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let view = reports::dashboard(&state.gateway).await?;
    Ok(render(&state, jar, Some(&user), |chrome| dashboard_page(chrome, &view)))
}
