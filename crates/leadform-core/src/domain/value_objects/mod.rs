//! Value Objects module
//!
//! Immutable, validated primitives used by form configurations.

pub mod connection;
pub mod consent;
pub mod field;
pub mod layout;
pub mod style;

pub use connection::ConnectionSettings;
pub use consent::{ConsentConfig, ConsentItem, ConsentKind};
pub use field::{FieldDefinition, FieldType};
pub use layout::{LayoutAssignment, WidthShare};
pub use style::{Color, StyleConfig};

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("invalid width share {0}%, expected 25, 50, 75 or 100")]
    InvalidWidth(u8),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid url for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Identifier for saved records
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse an absolute http(s) URL
pub(crate) fn parse_http_url(field: &'static str, value: &str) -> Result<url::Url, ValueError> {
    let invalid = || ValueError::InvalidUrl {
        field,
        value: value.to_string(),
    };
    let parsed = url::Url::parse(value.trim()).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(invalid()),
    }
}
