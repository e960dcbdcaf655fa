//! Consent Value Objects

use serde::{Deserialize, Serialize};

/// The two consents a form can ask for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsentKind {
    Privacy,
    Terms,
}

impl ConsentKind {
    /// Control name; consents gate submission but never reach the payload
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Privacy => "privacy_consent",
            Self::Terms => "terms_consent",
        }
    }

    pub fn document_name(&self) -> &'static str {
        match self {
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Service",
        }
    }
}

/// Consent checkboxes attached to the final step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    pub privacy_enabled: bool,
    pub privacy_url: Option<String>,
    pub privacy_default_checked: bool,
    pub terms_enabled: bool,
    pub terms_url: Option<String>,
    pub terms_default_checked: bool,
}

/// One enabled consent, resolved from [`ConsentConfig`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentItem<'a> {
    pub kind: ConsentKind,
    pub url: Option<&'a str>,
    pub default_checked: bool,
}

impl ConsentConfig {
    /// Enabled consents in display order (privacy first)
    pub fn enabled(&self) -> Vec<ConsentItem<'_>> {
        let mut items = Vec::with_capacity(2);
        if self.privacy_enabled {
            items.push(ConsentItem {
                kind: ConsentKind::Privacy,
                url: non_blank(self.privacy_url.as_deref()),
                default_checked: self.privacy_default_checked,
            });
        }
        if self.terms_enabled {
            items.push(ConsentItem {
                kind: ConsentKind::Terms,
                url: non_blank(self.terms_url.as_deref()),
                default_checked: self.terms_default_checked,
            });
        }
        items
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        [self.privacy_url.as_deref(), self.terms_url.as_deref()]
            .into_iter()
            .filter_map(non_blank)
    }
}

fn non_blank(url: Option<&str>) -> Option<&str> {
    url.map(str::trim).filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_order_and_blank_urls() {
        let config = ConsentConfig {
            privacy_enabled: true,
            privacy_url: Some("  ".into()),
            terms_enabled: true,
            terms_url: Some("https://example.com/terms".into()),
            terms_default_checked: true,
            ..Default::default()
        };
        let items = config.enabled();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ConsentKind::Privacy);
        assert_eq!(items[0].url, None);
        assert_eq!(items[1].url, Some("https://example.com/terms"));
        assert!(items[1].default_checked);
    }

    #[test]
    fn test_nothing_enabled() {
        assert!(ConsentConfig::default().enabled().is_empty());
    }
}
