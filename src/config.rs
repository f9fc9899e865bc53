use std::env;

use crate::fetch::MissingTokenPolicy;

/// AppConfig
///
/// Holds the console's entire configuration state. Loaded once at startup and
/// shared read-only with every handler and with the route guard via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the kiosk backend API (no trailing slash).
    pub api_url: String,
    // Socket address the console HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls log format and cookie hardening.
    pub env: Env,
    // Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    // What the fetch helper sends when the request has no access token.
    pub missing_token: MissingTokenPolicy,
}

/// Env
///
/// Defines the runtime context: local development (pretty logs, plain-http
/// cookies) or production (JSON logs, secure cookies, mandatory backend URL).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a non-panicking AppConfig for test scaffolding without touching
    /// environment variables.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            env: Env::Local,
            cookie_secure: false,
            missing_token: MissingTokenPolicy::Omit,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, failing fast on
    /// anything production cannot run without.
    ///
    /// # Panics
    /// Panics if `API_URL` is missing while `APP_ENV=production`.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_url = match env {
            Env::Production => {
                env::var("API_URL").expect("FATAL: API_URL must be set in production.")
            }
            Env::Local => env::var("API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(value) => matches!(value.as_str(), "1" | "true" | "yes"),
            Err(_) => env == Env::Production,
        };

        let missing_token = env::var("MISSING_TOKEN_POLICY")
            .map(|value| MissingTokenPolicy::parse(&value))
            .unwrap_or_default();

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            env,
            cookie_secure,
            missing_token,
        }
    }
}
