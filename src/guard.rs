use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::session::Session;

/// RouteClass
///
/// Every navigation path falls into exactly one of these, derived purely from
/// the path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login and signup. Pointless once a session exists.
    AuthPage,
    /// Needs a session token to be reachable.
    Protected,
    /// Not on either list. Always let through.
    Public,
}

/// GuardDecision
///
/// The single terminal outcome of evaluating one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToDashboard,
    RedirectToLogin,
}

/// RouteRules
///
/// Static path classification used by the route guard. Nothing here is fetched
/// from the backend. Anything not listed is allowed through, so extending the
/// protected list is the only way to close a path.
#[derive(Debug, Clone)]
pub struct RouteRules {
    /// Plain string prefixes. `/login` also covers `/login/reset` and `/loginx`.
    pub auth_prefixes: Vec<String>,
    /// Matched exactly, or as `route + "/"` prefix for sub-paths.
    pub protected_routes: Vec<String>,
    pub login_path: String,
    pub dashboard_path: String,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            auth_prefixes: vec!["/login".to_string(), "/signup".to_string()],
            protected_routes: ["/", "/dashboard", "/categories", "/menus", "/orders"]
                .into_iter()
                .map(String::from)
                .collect(),
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
        }
    }
}

impl RouteRules {
    pub fn is_auth_page(&self, path: &str) -> bool {
        self.auth_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_routes.iter().any(|route| {
            path == route.as_str()
                || path
                    .strip_prefix(route.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// classify
    ///
    /// Auth pages are checked first; the two lists are disjoint in the default
    /// rules so the order only matters for custom configurations.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_auth_page(path) {
            RouteClass::AuthPage
        } else if self.is_protected(path) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }

    /// decide
    ///
    /// Applies the guard rules in their fixed order:
    /// 1. auth page with a token -> dashboard
    /// 2. protected path without a token -> login
    /// 3. everything else -> allow
    pub fn decide(&self, path: &str, token_present: bool) -> GuardDecision {
        if self.is_auth_page(path) && token_present {
            return GuardDecision::RedirectToDashboard;
        }
        if self.is_protected(path) && !token_present {
            return GuardDecision::RedirectToLogin;
        }
        GuardDecision::Allow
    }

    /// Where a decision sends the browser, if anywhere.
    pub fn redirect_target(&self, decision: GuardDecision) -> Option<&str> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToDashboard => Some(self.dashboard_path.as_str()),
            GuardDecision::RedirectToLogin => Some(self.login_path.as_str()),
        }
    }
}

/// Path prefixes the guard never runs on: API calls, framework assets, favicon.
const UNGUARDED_PREFIXES: &[&str] = &[
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
];

/// Static image extensions that are always served without a session check.
const UNGUARDED_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".ico"];

/// is_guarded
///
/// The guard's matcher: true for navigation paths the guard should evaluate,
/// false for API routes and static assets.
pub fn is_guarded(path: &str) -> bool {
    if UNGUARDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return false;
    }
    !UNGUARDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// RouteRulesState
///
/// The shared, immutable rules handed to the guard middleware.
pub type RouteRulesState = Arc<RouteRules>;

/// route_guard
///
/// Middleware run on every navigation before any page handler. The decision is
/// taken synchronously from the request's cookie header alone: token presence
/// is all that matters, a forged or expired token passes and is rejected later
/// by the backend.
pub async fn route_guard(
    State(rules): State<RouteRulesState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !is_guarded(&path) {
        return next.run(request).await;
    }

    let token_present = Session::from_jar(&jar).is_authenticated();
    let decision = rules.decide(&path, token_present);

    match rules.redirect_target(decision) {
        Some(target) => {
            tracing::debug!(path = %path, ?decision, to = target, "route guard redirect");
            Redirect::temporary(target).into_response()
        }
        None => next.run(request).await,
    }
}
