//! Environment helpers shared by every crate's config loader

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("cannot read secret file {path}: {source}")]
    SecretFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Non-empty variable value, if set
fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_or(key: &str, default: &str) -> String {
    non_empty(key).unwrap_or_else(|| default.to_string())
}

pub fn env_opt(key: &str) -> Option<String> {
    non_empty(key)
}

/// Parse `key` or fall back to `default` when unset; a set-but-invalid value is an error
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match non_empty(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

pub fn require_env(key: &str) -> Result<String, ConfigError> {
    non_empty(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Comma separated list, blanks dropped
pub fn env_list(key: &str) -> Option<Vec<String>> {
    non_empty(key).map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Read a secret from the file named by `file_key` (Docker secrets),
/// then from `value_key`, then from `default_file` if it exists.
pub fn read_secret(
    file_key: &str,
    value_key: &str,
    default_file: Option<&str>,
) -> Result<String, ConfigError> {
    if let Some(path) = non_empty(file_key) {
        return read_secret_file(&path);
    }

    if let Some(value) = non_empty(value_key) {
        return Ok(value);
    }

    match default_file {
        Some(path) if Path::new(path).exists() => read_secret_file(path),
        _ => Err(ConfigError::Missing(format!("{value_key} (or {file_key})"))),
    }
}

fn read_secret_file(path: &str) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretFile {
        path: path.to_string(),
        source,
    })?;

    let secret = content.trim().to_string();
    if secret.is_empty() {
        return Err(ConfigError::Invalid {
            key: path.to_string(),
            message: "secret file is empty".to_string(),
        });
    }
    Ok(secret)
}
