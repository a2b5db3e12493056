//! TOML-based application configuration.
//!
//! Stores:
//! - Backend connection settings
//! - Poll cadence for the watch loop
//! - Notification preferences (webhook alerting)
//! - The default username for CLI commands
//!
//! Configuration is stored at `~/.config/restcycle/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Backend connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Watch-loop poll configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl PollConfig {
    /// Whether the interval sits in the recommended 2-5 second window.
    pub fn recommended(&self) -> bool {
        (2..=5).contains(&self.interval_secs)
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Optional webhook to POST alerts to, in addition to the terminal.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/restcycle/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Default username for CLI commands that take none.
    #[serde(default)]
    pub username: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_interval_secs() -> u64 {
    3
}
fn default_true() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll: PollConfig::default(),
            notifications: NotificationsConfig::default(),
            username: None,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/restcycle"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = key.split('.').try_fold(&json, |node, part| node.get(part))?;
        match value {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save. The new value is
    /// parsed according to the existing value's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_by_path(root: &mut Value, key: &str, raw: &str) -> Result<(), ConfigError> {
    let (parent_path, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let parent = match parent_path {
        Some(path) => path
            .split('.')
            .try_fold(&mut *root, |node, part| node.get_mut(part))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?,
        None => root,
    };
    let obj = parent
        .as_object_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let existing = obj
        .get(leaf)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let new_value = match existing {
        Value::Bool(_) => Value::Bool(raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{raw}' as bool"),
        })?),
        Value::Number(_) => {
            if let Ok(n) = raw.parse::<u64>() {
                Value::Number(n.into())
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n).map(Value::Number).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{raw}' as number"),
                    }
                })?
            } else {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{raw}' as number"),
                });
            }
        }
        // Strings and optional fields (serialized as null) take the raw text.
        _ => Value::String(raw.to_string()),
    };

    obj.insert(leaf.to_string(), new_value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.base_url, "http://localhost:5000");
        assert_eq!(parsed.poll.interval_secs, 3);
        assert!(parsed.notifications.enabled);
        assert!(parsed.username.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("poll.interval_secs").as_deref(), Some("3"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("backend.base_url").as_deref(),
            Some("http://localhost:5000")
        );
        assert!(cfg.get("backend.missing_key").is_none());
    }

    #[test]
    fn set_by_path_updates_number_and_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_by_path(&mut json, "poll.interval_secs", "5").unwrap();
        set_by_path(&mut json, "notifications.enabled", "false").unwrap();
        let cfg: Config = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.poll.interval_secs, 5);
        assert!(!cfg.notifications.enabled);
    }

    #[test]
    fn set_by_path_fills_optional_strings() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_by_path(&mut json, "username", "alice").unwrap();
        set_by_path(&mut json, "notifications.webhook_url", "http://hooks/x").unwrap();
        let cfg: Config = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.username.as_deref(), Some("alice"));
        assert_eq!(cfg.notifications.webhook_url.as_deref(), Some("http://hooks/x"));
    }

    #[test]
    fn set_by_path_rejects_unknown_key_and_bad_value() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(matches!(
            set_by_path(&mut json, "poll.missing", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_by_path(&mut json, "poll.interval_secs", "fast"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn poll_interval_recommendation_window() {
        let mut poll = PollConfig::default();
        assert!(poll.recommended());
        poll.interval_secs = 30;
        assert!(!poll.recommended());
    }
}
