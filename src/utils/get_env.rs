use anyhow::Error;
use dotenv::dotenv;
use std::env;

pub fn get_env_var(key: &str) -> Result<String, Error> {
    dotenv().ok();
    Ok(env::var(key)?)
}

/// Trims a raw value, treating blank as absent.
pub fn non_blank(raw: Option<String>) -> Option<String> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        _ => None,
    }
}

/// Reads `key`, treating an unset or blank variable as absent.
pub fn get_optional_env_var(key: &str) -> Option<String> {
    non_blank(get_env_var(key).ok())
}

pub fn get_env_var_or(key: &str, default: &str) -> String {
    get_optional_env_var(key).unwrap_or_else(|| default.to_string())
}
