//! Runtime configuration.
//!
//! Resolved once at startup from `AYUSHDESK_*` environment variables and then
//! passed into the application. Nothing reads the environment after that.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::http::DEFAULT_BASE_URL;

/// Default session database path.
pub const DEFAULT_DB_PATH: &str = "ayushdesk.db";

/// Default log file used in file logging mode.
pub const DEFAULT_LOG_FILE: &str = "ayushdesk.log";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be one of auto, file, stdout; got {value:?}")]
    InvalidLogMode { var: &'static str, value: String },
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    db_path: PathBuf,
    http_timeout: Option<Duration>,
    log_mode: LogMode,
    log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            http_timeout: None,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` on an empty base URL, a bad timeout or an unknown log mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset and blank values fall back
    /// to defaults, except the base URL which must not be blank when set.
    ///
    /// # Errors
    /// Returns `ConfigError` on an empty base URL, a bad timeout or an unknown log mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("AYUSHDESK_BASE_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty("AYUSHDESK_BASE_URL"));
            }
            config.base_url = url.to_string();
        }

        if let Some(path) = non_blank(lookup("AYUSHDESK_DB_PATH")) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = non_blank(lookup("AYUSHDESK_HTTP_TIMEOUT_SECS")) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: "AYUSHDESK_HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(mode) = non_blank(lookup("AYUSHDESK_LOG_MODE")) {
            config.log_mode = match mode.to_ascii_lowercase().as_str() {
                "auto" => LogMode::Auto,
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                _ => {
                    return Err(ConfigError::InvalidLogMode {
                        var: "AYUSHDESK_LOG_MODE",
                        value: mode,
                    })
                }
            };
        }

        if let Some(path) = non_blank(lookup("AYUSHDESK_LOG_FILE")) {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout
    }

    pub fn log_mode(&self) -> LogMode {
        self.log_mode
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("Should resolve");
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert_eq!(config.db_path(), Path::new("ayushdesk.db"));
        assert!(config.http_timeout().is_none());
        assert_eq!(config.log_mode(), LogMode::Auto);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("AYUSHDESK_BASE_URL", " https://ayush.example.org/api "),
            ("AYUSHDESK_DB_PATH", "/tmp/session.db"),
            ("AYUSHDESK_HTTP_TIMEOUT_SECS", "15"),
            ("AYUSHDESK_LOG_MODE", "Stdout"),
            ("AYUSHDESK_LOG_FILE", "/var/log/ayushdesk.log"),
        ]))
        .expect("Should resolve");

        assert_eq!(config.base_url(), "https://ayush.example.org/api");
        assert_eq!(config.db_path(), Path::new("/tmp/session.db"));
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.log_mode(), LogMode::Stdout);
        assert_eq!(config.log_file(), Path::new("/var/log/ayushdesk.log"));
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[("AYUSHDESK_BASE_URL", "  ")])).expect_err("Should reject");
        assert_eq!(err, ConfigError::Empty("AYUSHDESK_BASE_URL"));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        for value in ["0", "soon", "-3"] {
            let err = Config::from_lookup(lookup(&[("AYUSHDESK_HTTP_TIMEOUT_SECS", value)]))
                .expect_err("Should reject");
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{value}");
        }
    }

    #[test]
    fn test_unknown_log_mode_is_rejected() {
        let err = Config::from_lookup(lookup(&[("AYUSHDESK_LOG_MODE", "syslog")])).expect_err("Should reject");
        assert!(matches!(err, ConfigError::InvalidLogMode { .. }));
    }

    #[test]
    fn test_auto_log_mode_follows_terminal() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
