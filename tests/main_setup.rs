use mallang_console::{AppConfig, config::Env, fetch::MissingTokenPolicy};
use serial_test::serial;
use std::{env, panic};

const CONFIG_VARS: [&str; 5] = [
    "APP_ENV",
    "API_URL",
    "BIND_ADDR",
    "COOKIE_SECURE",
    "MISSING_TOKEN_POLICY",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with every config variable unset first, then restores whatever
/// the process had before.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // API_URL is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without API_URL"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_url, "http://localhost:8080");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert!(!config.cookie_secure);
    assert_eq!(config.missing_token, MissingTokenPolicy::Omit);
}

#[test]
#[serial]
fn test_app_config_production_hardens_cookies() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("API_URL", "https://api.mallang.kr/");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash trimmed so backend paths join cleanly.
    assert_eq!(config.api_url, "https://api.mallang.kr");
    assert!(config.cookie_secure);
}

#[test]
#[serial]
fn test_app_config_explicit_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("API_URL", "http://backend:9000");
            env::set_var("BIND_ADDR", "127.0.0.1:4000");
            env::set_var("COOKIE_SECURE", "true");
            env::set_var("MISSING_TOKEN_POLICY", "null");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_url, "http://backend:9000");
    assert_eq!(config.bind_addr, "127.0.0.1:4000");
    assert!(config.cookie_secure);
    assert_eq!(config.missing_token, MissingTokenPolicy::SendNull);
}

#[test]
fn test_app_config_default_is_local() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.missing_token, MissingTokenPolicy::Omit);
}
