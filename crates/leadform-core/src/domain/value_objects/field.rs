//! Field Value Objects
//!
//! Field definitions as authored on a service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValueError;

/// Supported control types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Date,
    Number,
    Password,
    Url,
    File,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Date,
        FieldType::Number,
        FieldType::Password,
        FieldType::Url,
        FieldType::File,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Date => "date",
            Self::Number => "number",
            Self::Password => "password",
            Self::Url => "url",
            Self::File => "file",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// `type` attribute for types rendered as a single `<input>`
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text
            | Self::Email
            | Self::Tel
            | Self::Date
            | Self::Number
            | Self::Password
            | Self::Url
            | Self::File => Some(self.as_str()),
            _ => None,
        }
    }

    /// Whether the type renders from the `options` list
    pub fn uses_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| ValueError::UnknownFieldType(s.to_string()))
    }
}

/// One field of a service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Input name and storage key, unique per service
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: vec![],
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Options as rendered: stored order, each trimmed. Options that only
    /// differ by surrounding whitespace stay as separate entries.
    pub fn rendered_options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.trim())
    }
}
