//! Runtime configuration read from the environment at startup.
//!
//! Supported:
//! - NEUROAI_STORE_PATH (SQLite file, default `neuroai.db`)
//! - NEUROAI_EPHEMERAL (`1`/`true`: keep the session in memory only)
//! - NEUROAI_API_URL (prediction backend, default `http://localhost:5000`)
//! - NEUROAI_API_TIMEOUT_SECS (default 120)
//! - NEUROAI_START_ROUTE (initial hash, e.g. `#/predictive`)
//! - NEUROAI_LOG_MODE (`auto`, `file` or `stdout`)
//! - NEUROAI_LOG_FILE (default `neuroai.log`)
//!
//! `NEUROAI_SANITIZE_MAX_BYTES` is read by the log sanitizer itself.
//! Unparseable values fall back to the default with a warning.

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::http::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when attached to a terminal (the TUI owns the screen), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "file" => Some(Self::File),
            "stdout" => Some(Self::Stdout),
            _ => None,
        }
    }

    /// Resolve `Auto` against whether stdout is a terminal.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::Auto => interactive,
            Self::File => true,
            Self::Stdout => false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub ephemeral: bool,
    pub api_url: String,
    pub api_timeout: Duration,
    pub start_route: String,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("neuroai.db"),
            ephemeral: false,
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout: DEFAULT_TIMEOUT,
            start_route: String::new(),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("neuroai.log"),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("NEUROAI_STORE_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.store_path = PathBuf::from(v);
        }

        if let Some(v) = lookup("NEUROAI_EPHEMERAL") {
            cfg.ephemeral = matches!(v.trim(), "1" | "true" | "TRUE" | "yes" | "YES");
        }

        if let Some(v) = lookup("NEUROAI_API_URL").filter(|v| !v.trim().is_empty()) {
            cfg.api_url = v.trim().trim_end_matches('/').to_string();
        }

        if let Some(v) = lookup("NEUROAI_API_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.api_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "Ignoring NEUROAI_API_TIMEOUT_SECS={:?}; using {}s",
                    v,
                    cfg.api_timeout.as_secs()
                ),
            }
        }

        if let Some(v) = lookup("NEUROAI_START_ROUTE") {
            cfg.start_route = v.trim().to_string();
        }

        if let Some(v) = lookup("NEUROAI_LOG_MODE") {
            match LogMode::parse(&v) {
                Some(mode) => cfg.log_mode = mode,
                None => tracing::warn!("Ignoring NEUROAI_LOG_MODE={:?}; using auto", v),
            }
        }

        if let Some(v) = lookup("NEUROAI_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            cfg.log_file = PathBuf::from(v);
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.api_url, "http://localhost:5000");
        assert_eq!(cfg.api_timeout, Duration::from_secs(120));
        assert_eq!(cfg.start_route, "");
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("NEUROAI_STORE_PATH", "/tmp/session.db"),
            ("NEUROAI_EPHEMERAL", "true"),
            ("NEUROAI_API_URL", "http://10.0.0.5:5000/"),
            ("NEUROAI_API_TIMEOUT_SECS", "30"),
            ("NEUROAI_START_ROUTE", "#/predictive"),
            ("NEUROAI_LOG_MODE", "Stdout"),
            ("NEUROAI_LOG_FILE", "/var/log/neuroai.log"),
        ]));

        assert_eq!(cfg.store_path, PathBuf::from("/tmp/session.db"));
        assert!(cfg.ephemeral);
        assert_eq!(cfg.api_url, "http://10.0.0.5:5000");
        assert_eq!(cfg.api_timeout, Duration::from_secs(30));
        assert_eq!(cfg.start_route, "#/predictive");
        assert_eq!(cfg.log_mode, LogMode::Stdout);
        assert_eq!(cfg.log_file, PathBuf::from("/var/log/neuroai.log"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("NEUROAI_API_TIMEOUT_SECS", "soon"),
            ("NEUROAI_LOG_MODE", "syslog"),
            ("NEUROAI_EPHEMERAL", "maybe"),
        ]));
        assert_eq!(cfg.api_timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.log_mode, LogMode::Auto);
        assert!(!cfg.ephemeral);
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
