//! Control model of a generated form
//!
//! Mirrors the controls the assembler emits, step by step, together with the
//! built-in constraint checks a browser applies to them.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::domain::value_objects::{ConsentConfig, ConsentKind, FieldType};
use crate::domain::{FormConfig, ServiceDefinition};
use crate::generator::layout::FormLayout;
use crate::runtime::RuntimeMessages;

/// What a control is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Field(FieldType),
    Consent(ConsentKind),
}

/// Container that receives the error indicator for a control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorGroup {
    RadioGroup,
    CheckboxWrapper,
    Field,
}

/// Outcome of a constraint check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    ValueMissing,
    TypeMismatch,
    BadInput,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Current value of a control
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    Files(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub name: String,
    pub kind: ControlKind,
    pub required: bool,
    /// Trimmed options for select/radio
    pub options: Vec<String>,
    pub default_checked: bool,
    pub step: u32,
}

impl Control {
    pub fn group(&self) -> ErrorGroup {
        match self.kind {
            ControlKind::Field(FieldType::Radio) => ErrorGroup::RadioGroup,
            ControlKind::Field(FieldType::Checkbox) | ControlKind::Consent(_) => {
                ErrorGroup::CheckboxWrapper
            }
            ControlKind::Field(_) => ErrorGroup::Field,
        }
    }

    pub fn is_checkable(&self) -> bool {
        matches!(
            self.kind,
            ControlKind::Field(FieldType::Checkbox) | ControlKind::Consent(_)
        )
    }

    pub fn is_choice(&self) -> bool {
        matches!(
            self.kind,
            ControlKind::Field(FieldType::Select) | ControlKind::Field(FieldType::Radio)
        )
    }

    pub fn initial_value(&self) -> Option<FieldValue> {
        self.is_checkable()
            .then_some(FieldValue::Checked(self.default_checked))
    }

    /// Built-in constraint check, as `checkValidity()` would report it
    pub fn check(&self, value: Option<&FieldValue>) -> Validity {
        let text = match value {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        };

        match self.kind {
            ControlKind::Field(FieldType::Checkbox) | ControlKind::Consent(_) => {
                let checked = matches!(value, Some(FieldValue::Checked(true)));
                missing_unless(self.required, checked)
            }
            ControlKind::Field(FieldType::File) => {
                let has_file = matches!(value, Some(FieldValue::Files(f)) if f.iter().any(|n| !n.is_empty()));
                missing_unless(self.required, has_file)
            }
            ControlKind::Field(FieldType::Email) => {
                let v = text.trim();
                if v.is_empty() {
                    missing_unless(self.required, false)
                } else if email_pattern().is_match(v) {
                    Validity::Valid
                } else {
                    Validity::TypeMismatch
                }
            }
            ControlKind::Field(FieldType::Url) => {
                let v = text.trim();
                if v.is_empty() {
                    missing_unless(self.required, false)
                } else if url::Url::parse(v).is_ok() {
                    Validity::Valid
                } else {
                    Validity::TypeMismatch
                }
            }
            ControlKind::Field(FieldType::Number) => {
                let v = text.trim();
                if v.is_empty() {
                    missing_unless(self.required, false)
                } else if v.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                    Validity::Valid
                } else {
                    Validity::BadInput
                }
            }
            ControlKind::Field(FieldType::Date) => {
                if text.is_empty() {
                    missing_unless(self.required, false)
                } else if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() {
                    Validity::Valid
                } else {
                    Validity::BadInput
                }
            }
            ControlKind::Field(_) => missing_unless(self.required, !text.is_empty()),
        }
    }

    /// Value as it appears in the collected form data, `None` when the
    /// control contributes nothing (unchecked boxes, consents, no file)
    pub fn submitted_value(&self, value: Option<&FieldValue>) -> Option<String> {
        match (self.kind, value) {
            (ControlKind::Consent(_), _) => None,
            (ControlKind::Field(FieldType::Checkbox), Some(FieldValue::Checked(true))) => {
                Some("true".to_string())
            }
            (ControlKind::Field(FieldType::Checkbox), _) => None,
            (ControlKind::Field(FieldType::Radio), Some(FieldValue::Text(v))) if !v.is_empty() => {
                Some(v.clone())
            }
            (ControlKind::Field(FieldType::Radio), _) => None,
            (ControlKind::Field(FieldType::File), Some(FieldValue::Files(files))) => {
                let names: Vec<&str> = files
                    .iter()
                    .map(String::as_str)
                    .filter(|n| !n.is_empty())
                    .collect();
                (!names.is_empty()).then(|| names.join(", "))
            }
            (ControlKind::Field(FieldType::File), _) => None,
            (ControlKind::Field(_), Some(FieldValue::Text(v))) => Some(v.clone()),
            (ControlKind::Field(_), _) => Some(String::new()),
        }
    }
}

fn missing_unless(required: bool, present: bool) -> Validity {
    if required && !present {
        Validity::ValueMissing
    } else {
        Validity::Valid
    }
}

/// Valid e-mail address as defined for `<input type="email">`
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("static e-mail pattern compiles")
    })
}

/// Every control of a generated form, in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormModel {
    controls: Vec<Control>,
    total_steps: u32,
    submit_label: String,
    messages: RuntimeMessages,
    thank_you_url: Option<String>,
}

impl FormModel {
    pub fn build(service: &ServiceDefinition, config: &FormConfig) -> Self {
        let layout = FormLayout::plan(&service.fields, &config.layout, config.multi_step);
        Self::from_layout(&layout, config)
    }

    pub fn from_layout(layout: &FormLayout<'_>, config: &FormConfig) -> Self {
        let mut controls = Vec::new();
        for step in layout.steps() {
            for placed in &step.fields {
                let field = placed.field;
                controls.push(Control {
                    name: field.name.clone(),
                    kind: ControlKind::Field(field.field_type),
                    required: field.required,
                    options: if field.field_type.uses_options() {
                        field.rendered_options().map(str::to_string).collect()
                    } else {
                        Vec::new()
                    },
                    default_checked: false,
                    step: step.index,
                });
            }
        }

        controls.extend(consent_controls(&config.consent, layout.total_steps()));

        Self {
            controls,
            total_steps: layout.total_steps(),
            submit_label: config.style.submit_label().to_string(),
            messages: RuntimeMessages::for_config(config),
            thank_you_url: config.integration.thank_you_url().map(str::to_string),
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn controls_on_step(&self, step: u32) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |c| c.step == step)
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_multi_step(&self) -> bool {
        self.total_steps > 1
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn messages(&self) -> &RuntimeMessages {
        &self.messages
    }

    pub fn thank_you_url(&self) -> Option<&str> {
        self.thank_you_url.as_deref()
    }
}

fn consent_controls(config: &ConsentConfig, last_step: u32) -> Vec<Control> {
    config
        .enabled()
        .into_iter()
        .map(|item| Control {
            name: item.kind.field_name().to_string(),
            kind: ControlKind::Consent(item.kind),
            required: true,
            options: Vec::new(),
            default_checked: item.default_checked,
            step: last_step,
        })
        .collect()
}
