//! Request-scoped identity from the signed session cookie.

use crate::auth::{Role, User};
use crate::flash::{self, Flash};
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

pub const SESSION_COOKIE: &str = "session";

/// The authenticated account for this request. Taking it as a handler argument makes the route
/// require a login: anonymous requests are redirected to `/login`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_readonly(&self) -> bool {
        !self.role.can_write()
    }

    fn encode(&self) -> String {
        format!("{}:{}:{}", self.id, self.role, self.username)
    }

    fn decode(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let id = parts.next()?.parse().ok()?;
        let role = parts.next()?.parse().ok()?;
        let username = parts.next()?.to_string();
        if username.is_empty() {
            return None;
        }
        Some(CurrentUser { id, username, role })
    }
}

impl From<&User> for CurrentUser {
    fn from(u: &User) -> Self {
        CurrentUser {
            id: u.id,
            username: u.username.clone(),
            role: u.role,
        }
    }
}

/// Start a session for `user`.
pub fn login(jar: SignedCookieJar, user: &CurrentUser) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, user.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

pub fn logout(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// The session identity, if the cookie is present, correctly signed and well formed.
pub fn current(jar: &SignedCookieJar) -> Option<CurrentUser> {
    jar.get(SESSION_COOKIE).and_then(|c| CurrentUser::decode(c.value()))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        match current(&jar) {
            Some(user) => Ok(user),
            None => Err(flash::redirect(jar, Flash::error("Please log in to access this page."), "/login")),
        }
    }
}
