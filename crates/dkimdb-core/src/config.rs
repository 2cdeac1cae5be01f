use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_COOKIE: &str = "next-auth.session-token";
pub const DEFAULT_GMAIL_API_PATH: &str = "api/gmail";
pub const DEFAULT_GMAIL_UPSERT_PATH: &str = "api/add_dsp";
pub const DEFAULT_FILE_UPSERT_PATH: &str = "api/upsert_dkim_record";
pub const DEFAULT_USER_AGENT: &str = "dkimdb/0.1 (dkim-archive-uploader)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the process environment so it can be tested with
/// a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let env = parse_environment(&or_default("DKIMDB_ENV", "development"));
    let base_url = parse_base_url(
        "DKIMDB_BASE_URL",
        &or_default("DKIMDB_BASE_URL", DEFAULT_BASE_URL),
    )?;
    let session_token = non_empty("DKIMDB_SESSION_TOKEN");
    let session_cookie_name = or_default("DKIMDB_SESSION_COOKIE", DEFAULT_SESSION_COOKIE);
    let gmail_api_path = or_default("DKIMDB_GMAIL_API_PATH", DEFAULT_GMAIL_API_PATH);
    let gmail_upsert_path = or_default("DKIMDB_GMAIL_UPSERT_PATH", DEFAULT_GMAIL_UPSERT_PATH);
    let file_upsert_path = or_default("DKIMDB_FILE_UPSERT_PATH", DEFAULT_FILE_UPSERT_PATH);
    let request_timeout_secs = parse_u64("DKIMDB_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DKIMDB_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("DKIMDB_LOG_LEVEL", "info");

    Ok(AppConfig {
        env,
        base_url,
        session_token,
        session_cookie_name,
        gmail_api_path,
        gmail_upsert_path,
        file_upsert_path,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Checks that the base URL has an http(s) scheme and a host, and strips any
/// trailing slashes. Full URL parsing happens when the HTTP client is built.
fn parse_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })?;
    if rest.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
