//! Consent Block Builder

use crate::domain::value_objects::{ConsentConfig, ConsentItem};
use crate::generator::fields::{required_marker, FieldContext, CHECKBOX_WRAPPER_CLASS};
use crate::generator::markup::Element;

/// Consent checkboxes for the last step, `None` when no consent is enabled
pub fn render_consents(config: &ConsentConfig, ctx: FieldContext<'_>) -> Option<Element> {
    let items = config.enabled();
    if items.is_empty() {
        return None;
    }

    Some(
        Element::new("div")
            .attr("class", "lf-consents")
            .children(items.iter().map(|item| render_consent(item, ctx))),
    )
}

fn render_consent(item: &ConsentItem<'_>, ctx: FieldContext<'_>) -> Element {
    let name = item.kind.field_name();
    let id = ctx.consent_id(name);

    let document = match item.url {
        Some(url) => Element::new("a")
            .attr("href", url)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(item.kind.document_name()),
        None => Element::new("span").text(item.kind.document_name()),
    };

    Element::new("div")
        .attr("class", format!("{CHECKBOX_WRAPPER_CLASS} lf-consent"))
        .attr("data-consent", name)
        .child(
            Element::new("input")
                .attr("type", "checkbox")
                .attr("id", id.as_str())
                .attr("name", name)
                .attr("value", "true")
                .attr("autocomplete", "off")
                .flag("required")
                .flag_if(item.default_checked, "checked"),
        )
        .child(
            Element::new("label")
                .attr("for", id)
                .text("I accept the ")
                .child(document)
                .child_opt(required_marker(true)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: FieldContext<'static> = FieldContext { id_prefix: "leadform-test" };

    #[test]
    fn test_no_consents() {
        assert!(render_consents(&ConsentConfig::default(), CTX).is_none());
    }

    #[test]
    fn test_privacy_only_linked_and_required() {
        let config = ConsentConfig {
            privacy_enabled: true,
            privacy_url: Some("https://example.com/privacy?a=1&b=2".into()),
            ..Default::default()
        };
        let html = render_consents(&config, CTX).unwrap().render();
        assert!(html.contains("name=\"privacy_consent\""));
        assert!(!html.contains("terms_consent"));
        assert!(html.contains(" required>"));
        assert!(!html.contains("checked"));
        assert!(html.contains("href=\"https://example.com/privacy?a=1&amp;b=2\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
    }

    #[test]
    fn test_terms_without_url_is_plain_text_and_default_checked() {
        let config = ConsentConfig {
            privacy_enabled: true,
            terms_enabled: true,
            terms_default_checked: true,
            ..Default::default()
        };
        let el = render_consents(&config, CTX).unwrap();
        let inputs: Vec<_> = el
            .descendants()
            .into_iter()
            .filter(|e| e.tag() == "input")
            .collect();
        assert_eq!(inputs.len(), 2);
        assert!(!inputs[0].has_flag("checked"));
        assert!(inputs[1].has_flag("checked"));
        assert!(inputs.iter().all(|i| i.has_flag("required")));

        let html = el.render();
        assert!(html.contains("<span>Terms of Service</span>"));
        assert!(!html.contains("<a "));
    }
}
