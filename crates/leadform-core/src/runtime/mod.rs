//! Generated client runtime
//!
//! The browser side of a generated form ships as `form-runtime.js`, inlined
//! into each document behind a `LEADFORM` constants block. [`FormModel`] and
//! [`FormSession`] reproduce its step machine, validation and submission
//! flow in Rust so the behavior can be exercised without a browser.

pub mod model;
pub mod session;

pub use model::{Control, ControlKind, ErrorGroup, FieldValue, FormModel, Validity};
pub use session::{
    InputError, MessageKind, FormSession, SessionMessage, SessionState, TransitionError,
    ValidationFailure,
};

use serde::Serialize;

use crate::domain::value_objects::ConnectionSettings;
use crate::domain::FormConfig;

/// Runtime module body
pub const FORM_RUNTIME_JS: &str = include_str!("form-runtime.js");

/// Public IP lookup endpoint used by generated forms
pub const IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Value stored when the IP lookup fails
pub const IP_SENTINEL: &str = "unknown";

/// User-facing runtime strings
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuntimeMessages {
    pub validation: String,
    pub failure: String,
    pub success: String,
    pub submitting: String,
}

impl Default for RuntimeMessages {
    fn default() -> Self {
        Self {
            validation: "Please complete the required fields.".into(),
            failure: "An error occurred during submission, please try again.".into(),
            success: "Thank you! Your request has been sent.".into(),
            submitting: "Sending…".into(),
        }
    }
}

impl RuntimeMessages {
    pub fn for_config(config: &FormConfig) -> Self {
        let mut messages = Self::default();
        if let Some(success) = config
            .style
            .success_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            messages.success = success.to_string();
        }
        messages
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StorageConstants<'a> {
    insert_url: String,
    access_key: &'a str,
}

/// Constants baked into the generated module
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConstants<'a> {
    wrapper_id: &'a str,
    tenant_id: &'a str,
    service: &'a str,
    storage: StorageConstants<'a>,
    ip_lookup_url: &'a str,
    thank_you_url: Option<&'a str>,
    webhook_url: Option<&'a str>,
    messages: RuntimeMessages,
}

impl<'a> RuntimeConstants<'a> {
    pub fn new(wrapper_id: &'a str, config: &'a FormConfig, connection: &'a ConnectionSettings) -> Self {
        Self {
            wrapper_id,
            tenant_id: config.integration.tenant_id.as_str(),
            service: config.service.as_str(),
            storage: StorageConstants {
                insert_url: connection.insert_url(),
                access_key: connection.access_key.as_str(),
            },
            ip_lookup_url: IP_LOOKUP_URL,
            thank_you_url: config.integration.thank_you_url(),
            webhook_url: config.integration.webhook_url(),
            messages: RuntimeMessages::for_config(config),
        }
    }
}

/// Full module source: constants block followed by the runtime body.
///
/// `<` is emitted as `\u003c` inside the JSON so configured strings cannot
/// terminate the surrounding `<script>` element.
pub fn module_source(constants: &RuntimeConstants<'_>) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(constants)?.replace('<', "\\u003c");
    Ok(format!("const LEADFORM = {json};\n{FORM_RUNTIME_JS}"))
}
