//! Field Renderer
//!
//! One field definition in, one markup fragment out. Every control carries
//! `autocomplete="off"` so browser autofill does not pre-fill lead forms.

use crate::domain::value_objects::{FieldDefinition, FieldType, LayoutAssignment};
use crate::generator::markup::Element;

/// Class of the generic container around every field
pub const FIELD_CLASS: &str = "lf-field";
/// Class of the radio container used as the error group
pub const RADIO_GROUP_CLASS: &str = "lf-radio-group";
/// Class of the checkbox container used as the error group
pub const CHECKBOX_WRAPPER_CLASS: &str = "lf-checkbox-wrapper";

const SELECT_PLACEHOLDER: &str = "Select…";

/// Per-document naming context
#[derive(Clone, Copy, Debug)]
pub struct FieldContext<'a> {
    pub id_prefix: &'a str,
}

impl FieldContext<'_> {
    /// Positional, so distinct field names can never share an id
    pub fn field_id(&self, position: usize) -> String {
        format!("{}-f{}", self.id_prefix, position)
    }

    pub fn consent_id(&self, name: &str) -> String {
        format!("{}-{}", self.id_prefix, name)
    }
}

pub fn render_field(
    field: &FieldDefinition,
    assignment: &LayoutAssignment,
    position: usize,
    ctx: FieldContext<'_>,
) -> Element {
    let id = ctx.field_id(position);
    let container = Element::new("div")
        .attr(
            "class",
            format!(
                "{} lf-w-m-{} lf-w-d-{}",
                FIELD_CLASS,
                assignment.width_mobile.percent(),
                assignment.width_desktop.percent()
            ),
        )
        .attr("data-field", field.name.as_str())
        .attr("data-type", field.field_type.as_str());

    match field.field_type {
        FieldType::Textarea => container
            .child(label_for(field, &id))
            .child(
                Element::new("textarea")
                    .attr("id", id.as_str())
                    .attr("name", field.name.as_str())
                    .attr("rows", "4")
                    .attr("autocomplete", "off")
                    .flag_if(field.required, "required"),
            ),
        FieldType::Select => container.child(label_for(field, &id)).child(
            Element::new("select")
                .attr("id", id.as_str())
                .attr("name", field.name.as_str())
                .attr("autocomplete", "off")
                .flag_if(field.required, "required")
                .child(Element::new("option").attr("value", "").text(SELECT_PLACEHOLDER))
                .children(
                    field
                        .rendered_options()
                        .map(|o| Element::new("option").attr("value", o).text(o)),
                ),
        ),
        FieldType::Radio => {
            let label_id = format!("{id}-label");
            container
                .child(
                    Element::new("span")
                        .attr("class", "lf-label")
                        .attr("id", label_id.as_str())
                        .text(field.label.as_str())
                        .child_opt(required_marker(field.required)),
                )
                .child(
                    Element::new("div")
                        .attr("class", RADIO_GROUP_CLASS)
                        .attr("role", "radiogroup")
                        .attr("aria-labelledby", label_id)
                        .children(field.rendered_options().enumerate().map(|(i, o)| {
                            Element::new("label")
                                .attr("class", "lf-choice")
                                .child(
                                    Element::new("input")
                                        .attr("type", "radio")
                                        .attr("id", format!("{id}-{i}"))
                                        .attr("name", field.name.as_str())
                                        .attr("value", o)
                                        .attr("autocomplete", "off")
                                        .flag_if(field.required, "required"),
                                )
                                .child(Element::new("span").text(o))
                        })),
                )
        }
        FieldType::Checkbox => container.child(
            Element::new("div")
                .attr("class", CHECKBOX_WRAPPER_CLASS)
                .child(
                    Element::new("input")
                        .attr("type", "checkbox")
                        .attr("id", id.as_str())
                        .attr("name", field.name.as_str())
                        .attr("value", "true")
                        .attr("autocomplete", "off")
                        .flag_if(field.required, "required"),
                )
                .child(label_for(field, &id)),
        ),
        single => container.child(label_for(field, &id)).child(
            Element::new("input")
                .attr("type", single.input_type().unwrap_or("text"))
                .attr("id", id.as_str())
                .attr("name", field.name.as_str())
                .attr("autocomplete", "off")
                .flag_if(field.required, "required"),
        ),
    }
}

fn label_for(field: &FieldDefinition, id: &str) -> Element {
    Element::new("label")
        .attr("for", id)
        .attr("class", "lf-label")
        .text(field.label.as_str())
        .child_opt(required_marker(field.required))
}

pub(crate) fn required_marker(required: bool) -> Option<Element> {
    required.then(|| {
        Element::new("span")
            .attr("class", "lf-required")
            .attr("aria-hidden", "true")
            .text("*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::WidthShare;

    const CTX: FieldContext<'static> = FieldContext { id_prefix: "leadform-test" };

    fn render(field: &FieldDefinition) -> String {
        render_field(field, &LayoutAssignment::default(), 0, CTX).render()
    }

    #[test]
    fn test_single_input_types() {
        for t in [
            FieldType::Text,
            FieldType::Email,
            FieldType::Tel,
            FieldType::Date,
            FieldType::Number,
            FieldType::Password,
            FieldType::Url,
            FieldType::File,
        ] {
            let html = render(&FieldDefinition::new("f", "F", t));
            assert!(html.contains(&format!("<input type=\"{}\"", t.as_str())), "{html}");
            assert!(html.contains("autocomplete=\"off\""));
            assert!(!html.contains("required"));
        }
    }

    #[test]
    fn test_required_marker_and_attribute() {
        let html = render(&FieldDefinition::new("nome", "Nome", FieldType::Text).required());
        assert!(html.contains("<span class=\"lf-required\" aria-hidden=\"true\">*</span>"));
        assert!(html.contains(" required>"));
        assert!(html.contains("id=\"leadform-test-f0\""));
    }

    #[test]
    fn test_select_trims_options_in_order() {
        let field = FieldDefinition::new("size", "Size", FieldType::Select)
            .with_options([" S", "S ", "M"])
            .required();
        let html = render(&field);
        assert!(html.contains(
            "<option value=\"\">Select…</option><option value=\"S\">S</option><option value=\"S\">S</option><option value=\"M\">M</option>"
        ));
        assert!(html.contains("<select id=\"leadform-test-f0\" name=\"size\" autocomplete=\"off\" required>"));
    }

    #[test]
    fn test_radio_group_required_on_every_option() {
        let field = FieldDefinition::new("contact", "Contact", FieldType::Radio)
            .with_options(["Phone", "Email"])
            .required();
        let html = render(&field);
        assert_eq!(html.matches("type=\"radio\"").count(), 2);
        assert_eq!(html.matches(" required>").count(), 2);
        assert!(html.contains("class=\"lf-radio-group\""));
    }

    #[test]
    fn test_checkbox_value_is_literal_true() {
        let html = render(&FieldDefinition::new("newsletter", "Newsletter", FieldType::Checkbox));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("value=\"true\""));
        assert!(html.contains("class=\"lf-checkbox-wrapper\""));
    }

    #[test]
    fn test_textarea() {
        let html = render(&FieldDefinition::new("note", "Note", FieldType::Textarea));
        assert!(html.contains("<textarea id=\"leadform-test-f0\" name=\"note\" rows=\"4\" autocomplete=\"off\"></textarea>"));
    }

    #[test]
    fn test_width_classes() {
        let assignment = LayoutAssignment::default().with_widths(WidthShare::Full, WidthShare::Half);
        let html = render_field(&FieldDefinition::new("a", "A", FieldType::Text), &assignment, 0, CTX).render();
        assert!(html.starts_with("<div class=\"lf-field lf-w-m-100 lf-w-d-50\""));
    }

    #[test]
    fn test_label_is_escaped() {
        let html = render(&FieldDefinition::new("a", "<script>alert(1)</script>", FieldType::Text));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
