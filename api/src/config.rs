//! Service configuration from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use leadform_core::{ConnectionSettings, ValueError};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid LEADFORM_BIND address {0:?}")]
    InvalidBind(String),
    #[error("LEADFORM_STORAGE_ENDPOINT is set but LEADFORM_STORAGE_KEY is missing")]
    MissingStorageKey,
    #[error("invalid storage settings: {0}")]
    Storage(#[from] ValueError),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// Storage the generated forms submit to; generation is disabled without it
    pub connection: Option<ConnectionSettings>,
    /// File-backed saved forms when set, in-memory otherwise
    pub forms_dir: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("LEADFORM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;

        let connection = match get("LEADFORM_STORAGE_ENDPOINT") {
            Some(endpoint) => {
                let key = get("LEADFORM_STORAGE_KEY").ok_or(ConfigError::MissingStorageKey)?;
                let mut settings = ConnectionSettings::new(endpoint, key)?;
                if let Some(table) = get("LEADFORM_STORAGE_TABLE") {
                    settings = settings.with_table(table);
                }
                Some(settings)
            }
            None => None,
        };

        Ok(Self {
            bind,
            connection,
            forms_dir: get("LEADFORM_FORMS_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND);
        assert!(cfg.connection.is_none());
        assert!(cfg.forms_dir.is_none());
    }

    #[test]
    fn test_storage_settings() {
        let cfg = config(&[
            ("LEADFORM_STORAGE_ENDPOINT", "https://db.example.com"),
            ("LEADFORM_STORAGE_KEY", "anon"),
            ("LEADFORM_STORAGE_TABLE", "contatti"),
            ("LEADFORM_FORMS_DIR", "/var/lib/leadform"),
        ])
        .unwrap();
        let connection = cfg.connection.unwrap();
        assert_eq!(connection.insert_url(), "https://db.example.com/rest/v1/contatti");
        assert_eq!(cfg.forms_dir, Some(PathBuf::from("/var/lib/leadform")));
    }

    #[test]
    fn test_rejects_incomplete_or_malformed_values() {
        assert!(matches!(
            config(&[("LEADFORM_STORAGE_ENDPOINT", "https://db.example.com")]),
            Err(ConfigError::MissingStorageKey)
        ));
        assert!(matches!(
            config(&[("LEADFORM_BIND", "localhost")]),
            Err(ConfigError::InvalidBind(_))
        ));
        assert!(matches!(
            config(&[("LEADFORM_STORAGE_ENDPOINT", "ftp://x"), ("LEADFORM_STORAGE_KEY", "k")]),
            Err(ConfigError::Storage(_))
        ));
    }
}
