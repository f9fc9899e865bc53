use std::convert::Infallible;
use std::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::models::TokenPair;

/// Cookie carrying the access token. The route guard only ever sees this one.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token. Stored and forwarded, never used to renew.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// SessionToken
///
/// An opaque credential issued by the backend. The console never parses,
/// decodes or verifies it; validity is decided by the backend on every call.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token string. Empty strings are not tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Session
///
/// The explicit session context handed to handlers and to the fetch helper.
/// Built from the request's cookies, which are the only place tokens live on
/// the console side.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub access: Option<SessionToken>,
    pub refresh: Option<SessionToken>,
}

impl Session {
    /// Reads both tokens from a parsed cookie jar by exact name.
    pub fn from_jar(jar: &CookieJar) -> Self {
        let read = |name: &str| {
            jar.get(name)
                .and_then(|cookie| SessionToken::new(cookie.value()))
        };
        Self {
            access: read(ACCESS_TOKEN_COOKIE),
            refresh: read(REFRESH_TOKEN_COOKIE),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }

    /// Renders the session's tokens as a `Cookie` request header value, or
    /// `None` when there is nothing to forward. Values are percent-encoded
    /// again, the inverse of the decoding done when the jar was parsed.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [
            (ACCESS_TOKEN_COOKIE, &self.access),
            (REFRESH_TOKEN_COOKIE, &self.refresh),
        ]
        .into_iter()
        .filter_map(|(name, token)| {
            token
                .as_ref()
                .map(|token| Cookie::new(name, token.as_str()).encoded().to_string())
        })
        .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

/// establish
///
/// The single write path for a new session: mirrors both tokens into cookies
/// on the outgoing response.
pub fn establish(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token, secure))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token, secure))
}

/// clear
///
/// The single write path for ending a session: expires both token cookies.
pub fn clear(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired_cookie(ACCESS_TOKEN_COOKIE, secure))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE, secure))
}

fn session_cookie(name: &'static str, value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}
