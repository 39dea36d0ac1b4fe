//! One-shot flash messages carried in a signed cookie across a redirect.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashKind {
    Ok,
    Warning,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Ok => "ok",
            FlashKind::Warning => "warning",
            FlashKind::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(FlashKind::Ok),
            "warning" => Some(FlashKind::Warning),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn ok(message: impl Into<String>) -> Self {
        Flash {
            kind: FlashKind::Ok,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Flash {
            kind: FlashKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Flash {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.message)
    }

    fn decode(s: &str) -> Option<Self> {
        let (kind, message) = s.split_once(':')?;
        Some(Flash {
            kind: FlashKind::parse(kind)?,
            message: message.to_string(),
        })
    }
}

/// Store `flash` for the next rendered page, replacing any pending one.
pub fn set(jar: SignedCookieJar, flash: Flash) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Remove and return the pending flash, if any.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let flash = Flash::decode(cookie.value());
            (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
        }
        None => (jar, None),
    }
}

/// Redirect (303) to `to` with a flash message for the target page.
pub fn redirect(jar: SignedCookieJar, flash: Flash, to: &str) -> Response {
    (set(jar, flash), Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    #[test]
    fn encode_decode() {
        let f = Flash::error("duplicate key value violates unique constraint \"Court_pkey\"");
        assert_eq!(Flash::decode(&f.encode()), Some(f));
        assert_eq!(Flash::decode("ok:Created: 3 rows"), Some(Flash::ok("Created: 3 rows")));
        assert_eq!(Flash::decode("bogus"), None);
        assert_eq!(Flash::decode("info:x"), None);
    }

    #[test]
    fn set_then_take_once() {
        let jar = SignedCookieJar::new(Key::generate());
        let jar = set(jar, Flash::ok("Created"));
        let (jar, flash) = take(jar);
        assert_eq!(flash, Some(Flash::ok("Created")));
        let (_, again) = take(jar);
        assert_eq!(again, None);
    }
}
