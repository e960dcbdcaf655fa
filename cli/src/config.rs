//! CLI Configuration

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use leadform_core::ConnectionSettings;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

pub const KEYS: [&str; 6] = [
    "api_url",
    "tenant_id",
    "storage_endpoint",
    "storage_key",
    "storage_table",
    "default_format",
];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub tenant_id: Option<String>,
    pub storage_endpoint: Option<String>,
    pub storage_key: Option<String>,
    pub storage_table: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            Self::parse(&fs::read_to_string(&path)?)
                .with_context(|| format!("invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".leadform").join(filename))
    }

    /// Command-line and environment values win over the file
    pub fn overlay(
        mut self,
        api_url: Option<String>,
        storage_endpoint: Option<String>,
        storage_key: Option<String>,
        tenant_id: Option<String>,
    ) -> Self {
        self.api_url = api_url.or(self.api_url);
        self.storage_endpoint = storage_endpoint.or(self.storage_endpoint);
        self.storage_key = storage_key.or(self.storage_key);
        self.tenant_id = tenant_id.or(self.tenant_id);
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn format(&self) -> OutputFormat {
        self.default_format
            .as_deref()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    }

    /// Storage the generated forms submit to
    pub fn connection(&self) -> anyhow::Result<ConnectionSettings> {
        let endpoint = self.storage_endpoint.as_deref().ok_or_else(|| {
            anyhow!("storage endpoint not set (use --storage-endpoint or LEADFORM_STORAGE_ENDPOINT)")
        })?;
        let key = self.storage_key.as_deref().ok_or_else(|| {
            anyhow!("storage key not set (use --storage-key or LEADFORM_STORAGE_KEY)")
        })?;

        let settings = ConnectionSettings::new(endpoint, key)?;
        Ok(match &self.storage_table {
            Some(table) => settings.with_table(table.as_str()),
            None => settings,
        })
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "tenant_id" => self.tenant_id.clone(),
            "storage_endpoint" => self.storage_endpoint.clone(),
            "storage_key" => self.storage_key.as_deref().map(mask),
            "storage_table" => self.storage_table.clone(),
            "default_format" => self.default_format.clone(),
            _ => bail!("Unknown config key: {}", key),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        let slot = match key {
            "api_url" => &mut self.api_url,
            "tenant_id" => &mut self.tenant_id,
            "storage_endpoint" => &mut self.storage_endpoint,
            "storage_key" => &mut self.storage_key,
            "storage_table" => &mut self.storage_table,
            "default_format" => {
                value
                    .parse::<OutputFormat>()
                    .map_err(|_| anyhow!("default_format must be table, json or yaml"))?;
                &mut self.default_format
            }
            _ => bail!("Unknown config key: {}", key),
        };
        *slot = Some(value);
        Ok(())
    }
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(8).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_overlay() {
        let config = Config::parse(
            r#"
            api_url = "https://forms.example.com/api/v1"
            tenant_id = "tenant-file"
            storage_endpoint = "https://db.example.com"
            default_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.format(), OutputFormat::Json);

        let merged = config.overlay(None, None, Some("anon-key".into()), Some("tenant-cli".into()));
        assert_eq!(merged.api_url(), "https://forms.example.com/api/v1");
        assert_eq!(merged.tenant_id.as_deref(), Some("tenant-cli"));

        let connection = merged.connection().unwrap();
        assert_eq!(connection.insert_url(), "https://db.example.com/rest/v1/leads");
    }

    #[test]
    fn test_connection_requires_endpoint_and_key() {
        let err = Config::default().connection().unwrap_err();
        assert!(err.to_string().contains("LEADFORM_STORAGE_ENDPOINT"));

        let config = Config {
            storage_endpoint: Some("https://db.example.com".into()),
            ..Config::default()
        };
        assert!(config.connection().unwrap_err().to_string().contains("LEADFORM_STORAGE_KEY"));
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("storage_key", "abcdefghijkl".into()).unwrap();
        config.set("storage_table", "contacts".into()).unwrap();
        assert_eq!(config.get("storage_key").unwrap().as_deref(), Some("abcdefgh****"));
        assert_eq!(config.get("storage_table").unwrap().as_deref(), Some("contacts"));
        assert_eq!(config.get("api_url").unwrap(), None);

        assert!(config.set("default_format", "xml".into()).is_err());
        assert!(config.set("colour", "blue".into()).is_err());
        assert!(config.get("colour").is_err());
    }
}
