//! Service configuration loading and parsing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/attache/tools.toml";

/// Root configuration structure
#[derive(Debug, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub deepl: DeeplSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_audit_db")]
    pub audit_db: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            audit_db: default_audit_db(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Account used to authenticate. Empty means "log in as from_address".
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_true")]
    pub ssl: bool,
    /// Appended to every outgoing email at send time. May contain markup.
    #[serde(default)]
    pub signature: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
            from_name: default_from_name(),
            ssl: true,
            signature: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeeplSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_deepl_endpoint")]
    pub endpoint: String,
}

impl Default for DeeplSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_deepl_endpoint(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { "0.0.0.0:50061".into() }
fn default_audit_db() -> String { "/var/lib/attache/ledger/audit.db".into() }
fn default_smtp_host() -> String { "smtp.gmail.com".into() }
fn default_smtp_port() -> u16 { 465 }
fn default_from_address() -> String { "someone@example.com".into() }
fn default_from_name() -> String { "Attache Assistant".into() }
fn default_deepl_endpoint() -> String { "https://api-free.deepl.com/v2/translate".into() }
fn default_true() -> bool { true }

/// Load configuration from /etc/attache/tools.toml (or `ATTACHE_CONFIG`).
///
/// Secrets can be injected through `ATTACHE_SMTP_PASSWORD` and
/// `ATTACHE_DEEPL_API_KEY`, which take precedence over file values.
pub fn load_config() -> Result<ToolsConfig> {
    let config_path =
        std::env::var("ATTACHE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&config_path).exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {config_path}"))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {config_path}"))?
    } else {
        tracing::warn!("Config file not found at {config_path}, using defaults");
        ToolsConfig {
            service: ServiceConfig::default(),
            smtp: SmtpSettings::default(),
            deepl: DeeplSettings::default(),
        }
    };

    if let Ok(password) = std::env::var("ATTACHE_SMTP_PASSWORD") {
        config.smtp.password = password;
    }
    if let Ok(api_key) = std::env::var("ATTACHE_DEEPL_API_KEY") {
        config.deepl.api_key = api_key;
    }

    Ok(config)
}
