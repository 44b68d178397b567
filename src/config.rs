//! Application Configuration
//!
//! JSON config file with defaults for anything missing. Mail credentials
//! never live in the file; they come from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote collection holding the showcase items
    pub collection: String,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    /// Segment size before the log rotates
    pub log_max_bytes: u64,
    /// Log segments kept, live one included
    pub log_max_files: usize,
    pub mail: MailServer,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collection: "projects".to_string(),
            db_path: PathBuf::from("showcase.db"),
            log_dir: PathBuf::from("logs"),
            log_max_bytes: 1024 * 1024,
            log_max_files: 5,
            mail: MailServer::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> DomainResult<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| DomainError::Config(format!("Invalid config: {}", e)))?;
        if config.collection.trim().is_empty() {
            return Err(DomainError::Config("collection must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Config(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| DomainError::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn rolling(&self) -> rolling_logger::RollingConfig {
        rolling_logger::RollingConfig {
            max_bytes: self.log_max_bytes,
            max_files: self.log_max_files,
        }
    }
}

/// SMTP endpoint and sender identity (non-secret part)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailServer {
    pub host: String,
    pub port: u16,
    pub sender_name: String,
}

impl Default for MailServer {
    fn default() -> Self {
        Self {
            host: "smtp.seznam.cz".to_string(),
            port: 465,
            sender_name: "Showcase web".to_string(),
        }
    }
}

/// Everything needed to relay a contact message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub sender_name: String,
    pub user: String,
    pub password: String,
    /// Recipient of relayed messages
    pub to: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        let server = MailServer::default();
        Self {
            host: server.host,
            port: server.port,
            sender_name: server.sender_name,
            user: String::new(),
            password: String::new(),
            to: String::new(),
        }
    }
}

impl MailSettings {
    /// Combine the server config with `EMAIL_USER`, `EMAIL_PASS` and `EMAIL_TO`
    pub fn from_env(server: &MailServer) -> DomainResult<Self> {
        Self::from_lookup(server, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        server: &MailServer,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> DomainResult<Self> {
        let var = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DomainError::Config(format!("{} is not set", key)))
        };
        Ok(Self {
            host: server.host.clone(),
            port: server.port,
            sender_name: server.sender_name.clone(),
            user: var("EMAIL_USER")?,
            password: var("EMAIL_PASS")?,
            to: var("EMAIL_TO")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.collection, "projects");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_json(r#"{"collection": "showcase", "mail": {"port": 587}}"#).unwrap();
        assert_eq!(config.collection, "showcase");
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.host, "smtp.seznam.cz");
        assert_eq!(config.log_max_files, 5);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(AppConfig::from_json("{"), Err(DomainError::Config(_))));
        assert!(matches!(
            AppConfig::from_json(r#"{"collection": ""}"#),
            Err(DomainError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            collection: "featured".to_string(),
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_mail_settings_require_credentials() {
        let mut env = HashMap::new();
        env.insert("EMAIL_USER", "web@example.test");
        env.insert("EMAIL_PASS", "secret");

        let lookup = |env: HashMap<&'static str, &'static str>| {
            move |key: &str| env.get(key).map(|v| v.to_string())
        };

        let err = MailSettings::from_lookup(&MailServer::default(), lookup(env.clone())).unwrap_err();
        assert_eq!(err, DomainError::Config("EMAIL_TO is not set".to_string()));

        env.insert("EMAIL_TO", "owner@example.test");
        let settings = MailSettings::from_lookup(&MailServer::default(), lookup(env)).unwrap();
        assert_eq!(settings.user, "web@example.test");
        assert_eq!(settings.to, "owner@example.test");
        assert_eq!(settings.port, 465);
    }
}
