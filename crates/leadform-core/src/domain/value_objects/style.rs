//! Style Value Objects
//!
//! Colors and labels applied to the generated form.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValueError;

/// CSS hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ValueError::InvalidColor(value.clone()))?;

        if !matches!(hex.len(), 3 | 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValueError::InvalidColor(value));
        }

        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn color(value: &str) -> Color {
    Color(value.to_string())
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

fn default_true() -> bool {
    true
}

/// Visual configuration of one form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub primary_color: Color,
    pub button_text_color: Color,
    pub form_background_color: Color,
    pub text_color: Color,
    pub label_color: Color,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub show_title: bool,
    /// Inline message shown when no thank-you URL is configured
    #[serde(default)]
    pub success_message: Option<String>,
    #[serde(default = "default_true")]
    pub show_step_indicator: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            primary_color: color("#2563eb"),
            button_text_color: color("#ffffff"),
            form_background_color: color("#ffffff"),
            text_color: color("#111827"),
            label_color: color("#374151"),
            submit_label: default_submit_label(),
            title: None,
            show_title: false,
            success_message: None,
            show_step_indicator: true,
        }
    }
}

impl StyleConfig {
    /// Title to render, if any
    pub fn visible_title(&self) -> Option<&str> {
        if !self.show_title {
            return None;
        }
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn submit_label(&self) -> &str {
        let label = self.submit_label.trim();
        if label.is_empty() {
            "Submit"
        } else {
            label
        }
    }
}
