//! Server configuration

use formgate_core::{StaticTokenResolver, Tier};
use formgate_workflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: String,
    pub max_retries: u32,
    #[serde(skip_serializing)]
    pub admin_token: Option<String>,
    #[serde(skip_serializing)]
    pub higher_official_token: Option<String>,
    #[serde(skip_serializing)]
    pub super_official_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_url: "sqlite:data/formgate.db?mode=rwc".to_string(),
            log_level: "info".to_string(),
            max_retries: WorkflowConfig::default().max_retries,
            admin_token: None,
            higher_official_token: None,
            super_official_token: None,
        }
    }
}

impl AppConfig {
    /// Load config từ environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load config từ một nguồn key/value bất kỳ; giá trị thiếu hoặc sai dùng default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let token = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: lookup("FORMGATE_HOST").unwrap_or(defaults.host),
            port: lookup("FORMGATE_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: lookup("FORMGATE_DATABASE_URL").unwrap_or(defaults.database_url),
            log_level: lookup("FORMGATE_LOG_LEVEL").unwrap_or(defaults.log_level),
            max_retries: lookup("FORMGATE_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            admin_token: token("FORMGATE_ADMIN_TOKEN"),
            higher_official_token: token("FORMGATE_HIGHER_OFFICIAL_TOKEN"),
            super_official_token: token("FORMGATE_SUPER_OFFICIAL_TOKEN"),
        }
    }

    /// Lấy địa chỉ bind đầy đủ
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Role gate built from the configured tier tokens
    pub fn role_resolver(&self) -> StaticTokenResolver {
        StaticTokenResolver::new()
            .with_optional_token(Tier::Admin, self.admin_token.clone())
            .with_optional_token(Tier::HigherOfficial, self.higher_official_token.clone())
            .with_optional_token(Tier::SuperOfficial, self.super_official_token.clone())
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            max_retries: self.max_retries,
            ..WorkflowConfig::default()
        }
    }

    /// File path behind a `sqlite:` URL, if it names a file
    pub fn database_path(&self) -> Option<PathBuf> {
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
