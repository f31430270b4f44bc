//! Runtime settings: `.env` file, then environment, then CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LOG_FILE: &str = "dash.log";

const ENV_API_BASE: &str = "DASH_API_BASE";
const ENV_TIMEOUT: &str = "DASH_TIMEOUT_SECS";
const ENV_LOG_FILE: &str = "DASH_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Backend origin, without a trailing slash.
    pub api_base: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Where the TUI writes its log (stdout belongs to the terminal).
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            settings.api_base = normalize_base(&base)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            settings.timeout = Some(parse_timeout(&raw)?);
        }
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            settings.log_file = PathBuf::from(path.trim());
        }

        Ok(settings)
    }

    /// Apply CLI overrides on top of environment values.
    pub fn with_overrides(mut self, api_base: Option<&str>, timeout_secs: Option<u64>) -> Result<Self, AppError> {
        if let Some(base) = api_base {
            self.api_base = normalize_base(base)?;
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(AppError::usage("--timeout must be at least 1 second."));
            }
            self.timeout = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Absolute URL for an API path such as `/api/status`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn normalize_base(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::usage(format!(
            "Invalid API base '{raw}': expected an http:// or https:// origin."
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::usage(format!("Invalid {ENV_TIMEOUT} '{raw}': {e}")))?;
    if secs == 0 {
        return Err(AppError::usage(format!("{ENV_TIMEOUT} must be at least 1 second.")));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.endpoint("/api/status"), "http://127.0.0.1:5000/api/status");
    }

    #[test]
    fn environment_values_are_normalized() {
        let s = Settings::from_lookup(lookup(&[
            ("DASH_API_BASE", " http://localhost:8080/ "),
            ("DASH_TIMEOUT_SECS", "15"),
            ("DASH_LOG_FILE", "/tmp/dash-test.log"),
        ]))
        .unwrap();
        assert_eq!(s.api_base, "http://localhost:8080");
        assert_eq!(s.timeout, Some(Duration::from_secs(15)));
        assert_eq!(s.log_file, PathBuf::from("/tmp/dash-test.log"));
    }

    #[test]
    fn rejects_bad_values_as_usage_errors() {
        let err = Settings::from_lookup(lookup(&[("DASH_API_BASE", "localhost:5000")])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);

        let err = Settings::from_lookup(lookup(&[("DASH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);

        assert!(Settings::from_lookup(lookup(&[("DASH_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let s = Settings::default()
            .with_overrides(Some("https://dash.example.com"), Some(5))
            .unwrap();
        assert_eq!(s.api_base, "https://dash.example.com");
        assert_eq!(s.timeout, Some(Duration::from_secs(5)));

        assert!(Settings::default().with_overrides(None, Some(0)).is_err());
        let untouched = Settings::default().with_overrides(None, None).unwrap();
        assert_eq!(untouched, Settings::default());
    }
}
