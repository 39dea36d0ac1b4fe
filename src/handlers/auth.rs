//! Login, signup and logout. None of these require a session.

use crate::auth::{session, CurrentUser, Role, UserStore};
use crate::error::{AppError, AuthError};
use crate::flash::{self, Flash};
use crate::handlers::render;
use crate::state::AppState;
use crate::views::{login_page, signup_page};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl SignupForm {
    /// Submitted role; blank or missing means `readonly`.
    fn role(&self) -> Result<Role, AuthError> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(Role::ReadOnly),
            Some(r) => r.parse(),
        }
    }
}

pub async fn login_form(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let user = session::current(&jar);
    render(&state, jar, user.as_ref(), login_page)
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match UserStore::authenticate(state.pool(), &form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(username = %user.username, role = %user.role, "login");
            let jar = session::login(jar, &CurrentUser::from(&user));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AppError::Auth(e)) => {
            tracing::info!(username = %form.username, "login rejected");
            Ok(flash::redirect(jar, Flash::error(e.to_string()), "/login"))
        }
        Err(e) => Err(e),
    }
}

pub async fn signup_form(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let user = session::current(&jar);
    render(&state, jar, user.as_ref(), signup_page)
}

pub async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let created = match form.role() {
        Ok(role) => UserStore::create(state.pool(), &form.username, &form.password, role).await,
        Err(e) => Err(e.into()),
    };
    match created {
        Ok(user) => {
            tracing::info!(username = %user.username, role = %user.role, "signup");
            Ok(flash::redirect(jar, Flash::ok("User registered. Please login."), "/login"))
        }
        Err(AppError::Auth(AuthError::Hash(msg))) => Err(AuthError::Hash(msg).into()),
        Err(AppError::Auth(e)) => Ok(flash::redirect(jar, Flash::error(e.to_string()), "/signup")),
        Err(e) => Err(e),
    }
}

pub async fn logout(jar: SignedCookieJar) -> Response {
    (session::logout(jar), Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(role: Option<&str>) -> SignupForm {
        SignupForm {
            username: "u".into(),
            password: "p".into(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn signup_role_defaults_to_readonly() {
        assert_eq!(form(None).role().unwrap(), Role::ReadOnly);
        assert_eq!(form(Some(" ")).role().unwrap(), Role::ReadOnly);
        assert_eq!(form(Some("admin")).role().unwrap(), Role::Admin);
        assert!(matches!(form(Some("root")).role(), Err(AuthError::InvalidRole(_))));
    }
}
