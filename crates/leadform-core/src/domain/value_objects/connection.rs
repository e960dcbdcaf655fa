//! Storage connection settings baked into generated documents

use serde::{Deserialize, Serialize};

use super::{parse_http_url, ValueError};

fn default_table() -> String {
    "leads".to_string()
}

/// Hosted row-store connection used by the generated runtime.
///
/// The credential ends up in plain text inside every generated document;
/// it must be a public, insert-only key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub access_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

impl ConnectionSettings {
    pub fn new(endpoint: impl Into<String>, access_key: impl Into<String>) -> Result<Self, ValueError> {
        let settings = Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            table: default_table(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        parse_http_url("storage endpoint", &self.endpoint)?;
        Ok(())
    }

    /// Insert URL for the lead table (`{endpoint}/rest/v1/{table}`)
    pub fn insert_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.endpoint.trim().trim_end_matches('/'),
            self.table.trim()
        )
    }
}
