//! Shared setup for database-backed tests: schema bootstrap, seeded accounts and a
//! cookie-carrying client over the router.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::Response,
    Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use forensic_console::auth::Role;
use forensic_console::flash::{self, Flash};
use forensic_console::{app, apply_forensic_schema, ensure_users_table, AppState, Registry, UserStore};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tower::ServiceExt;

pub const ADMIN: (&str, &str) = ("admin", "admin123");
pub const VIEWER: (&str, &str) = ("viewer", "viewer-pass");

/// Forensic schema, routines, the bootstrapped admin and one read-only account.
pub async fn setup(pool: PgPool) -> AppState {
    let registry = Registry::forensic().expect("registry");
    ensure_users_table(&pool).await.expect("users table");
    apply_forensic_schema(&pool, &registry).await.expect("schema");
    UserStore::bootstrap_admin(&pool, ADMIN.0, ADMIN.1).await.expect("admin");
    UserStore::create(&pool, VIEWER.0, VIEWER.1, Role::ReadOnly)
        .await
        .expect("viewer");
    AppState::new(pool, registry, "integration-secret")
}

pub struct Client {
    state: AppState,
    router: Router,
    cookies: BTreeMap<String, String>,
}

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Client {
    pub fn new(state: AppState) -> Self {
        Client {
            router: app(state.clone()),
            state,
            cookies: BTreeMap::new(),
        }
    }

    pub async fn login(state: &AppState, (username, password): (&str, &str)) -> Self {
        let mut client = Client::new(state.clone());
        let reply = client
            .post("/login", &[("username", username), ("password", password)])
            .await;
        assert_eq!(reply.location.as_deref(), Some("/"), "login as {username}");
        client
    }

    pub async fn get(&mut self, uri: &str) -> Reply {
        let req = Request::builder().uri(uri);
        self.send(req, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Reply {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req, Body::from(body)).await
    }

    /// The pending flash message, consumed.
    pub fn take_flash(&mut self) -> Option<Flash> {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&self.cookie_header()).expect("cookie header"));
        let jar = SignedCookieJar::from_headers(&headers, self.state.cookie_key.clone());
        self.cookies.remove(flash::FLASH_COOKIE);
        flash::take(jar).1
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    async fn send(&mut self, mut req: axum::http::request::Builder, body: Body) -> Reply {
        if !self.cookies.is_empty() {
            req = req.header(header::COOKIE, self.cookie_header());
        }
        let resp: Response = self
            .router
            .clone()
            .oneshot(req.body(body).expect("request"))
            .await
            .expect("infallible");
        for set in resp.headers().get_all(header::SET_COOKIE) {
            let set = set.to_str().expect("ascii cookie");
            let pair = set.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                if set.contains("Max-Age=0") {
                    self.cookies.remove(name);
                } else {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }
        }
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        Reply {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Minimal form encoding for test values.
fn encode(s: &str) -> String {
    let mut out = String::new();
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
