//! Process configuration, read once at start-up.
//!
//! Values come from `<config dir>/guardian/config.json` (or an explicit path)
//! and are then overridden by environment variables.

use crate::core::constants::{DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECONDS};
use crate::core::error::ConfigError;
use crate::remote::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const API_KEY_ENV: &str = "BUNGIE_API_KEY";
pub const LOCAL_ADDRS_ENV: &str = "GUARDIAN_LOCAL_ADDRS";
pub const LOG_ENV: &str = "GUARDIAN_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Local addresses the client pool binds to, one client each.
    pub local_addresses: Vec<String>,
    pub request_timeout_secs: u64,
    pub retry: RetryPolicy,
    /// JSON item definition table used for name lookup.
    pub definitions_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            local_addresses: Vec::new(),
            request_timeout_secs: REQUEST_TIMEOUT_SECONDS,
            retry: RetryPolicy::default(),
            definitions_path: None,
            log_level: "info".to_string(),
        }
    }
}

/// `<config dir>/guardian/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("guardian").join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Reads the file (defaults when it does not exist), applies the process
    /// environment and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        let mut config = Self::from_file_or_default(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Applies overrides from `var`, normally the process environment.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(addresses) = var(LOCAL_ADDRS_ENV) {
            self.local_addresses = addresses
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(level) = var(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .local_addresses
            .iter()
            .find(|a| a.parse::<IpAddr>().is_err())
        {
            return Err(ConfigError::InvalidAddress(bad.clone()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Missing("retry.max_attempts"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_ms, 1000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_key": "abc", "local_addresses": ["::1"],
                "retry": {"max_attempts": 3, "backoff_ms": 10}}"#,
        )
        .unwrap();

        let config = Config::from_file_or_default(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.local_addresses, vec!["::1".to_string()]);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::from_file_or_default(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        config.apply_overrides(env(&[
            (API_KEY_ENV, "from-env"),
            (LOCAL_ADDRS_ENV, " 10.0.0.1, ,2604:a880:1:20::4274:b001 "),
            (LOG_ENV, "debug"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.local_addresses, vec!["10.0.0.1", "2604:a880:1:20::4274:b001"]);
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        config.apply_overrides(env(&[(API_KEY_ENV, "  "), (LOG_ENV, "")]));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let config = Config {
            local_addresses: vec!["127.0.0.1".to_string(), "nowhere".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAddress(addr)) if addr == "nowhere"
        ));
    }

    #[test]
    fn test_default_path_is_under_guardian_dir() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("guardian/config.json"));
        }
    }
}
