//! Step machine of a generated form
//!
//! `Editing(step)` moves forward only through a valid step, backward freely,
//! and submits only from the last step. While `Submitting` every transition
//! is refused; a failed submission returns to `Editing` on the last step.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::FieldType;
use crate::runtime::model::{Control, ControlKind, ErrorGroup, FieldValue, FormModel, Validity};
use crate::submission::{FormPayload, SubmissionError, SubmissionOutcome, SubmissionPipeline};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Submitting,
    Completed(SubmissionOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Validation,
    Failure,
}

/// Message shown in the form's message area
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionMessage {
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Control that receives focus
    pub first_invalid: String,
    pub validity: Validity,
    /// Every invalid control in the checked scope, in document order
    pub invalid: Vec<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} invalid control(s), first is {} ({:?})",
            self.invalid.len(),
            self.first_invalid,
            self.validity
        )
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("no step after step {0}")]
    NoNextStep(u32),
    #[error("no step before step {0}")]
    NoPreviousStep(u32),
    #[error("submit is only available on the last step (on {current} of {last})")]
    NotOnLastStep { current: u32, last: u32 },
    #[error("validation failed: {0}")]
    Invalid(ValidationFailure),
    #[error("a submission is already in progress")]
    Busy,
    #[error("the form has already been submitted")]
    Completed,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown control: {0}")]
    UnknownControl(String),
    #[error("control {name} does not accept {operation}")]
    WrongKind { name: String, operation: &'static str },
    #[error("control {name} has no option {option:?}")]
    UnknownOption { name: String, option: String },
    #[error("the form is not editable")]
    Locked,
}

/// One visitor's interaction with a generated form
#[derive(Clone, Debug)]
pub struct FormSession {
    model: FormModel,
    current_step: u32,
    values: BTreeMap<String, FieldValue>,
    state: SessionState,
    message: Option<SessionMessage>,
    error_groups: Vec<(String, ErrorGroup)>,
    focused: Option<String>,
}

impl FormSession {
    pub fn new(model: FormModel) -> Self {
        let values = initial_values(&model);
        Self {
            model,
            current_step: 1,
            values,
            state: SessionState::Editing,
            message: None,
            error_groups: Vec::new(),
            focused: None,
        }
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn message(&self) -> Option<&SessionMessage> {
        self.message.as_ref()
    }

    /// Controls whose container carries the error indicator
    pub fn error_groups(&self) -> &[(String, ErrorGroup)] {
        &self.error_groups
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(self.state, SessionState::Editing)
    }

    pub fn submit_label(&self) -> &str {
        match self.state {
            SessionState::Submitting => &self.model.messages().submitting,
            _ => self.model.submit_label(),
        }
    }

    // -- input --------------------------------------------------------------

    /// Types into a text-like control
    pub fn fill(&mut self, name: &str, value: impl Into<String>) -> Result<(), InputError> {
        let control = self.editable(name)?;
        if control.is_checkable() || control.is_choice() || control.kind == ControlKind::Field(FieldType::File) {
            return Err(wrong_kind(control, "text"));
        }
        self.values.insert(name.to_string(), FieldValue::Text(value.into()));
        Ok(())
    }

    /// Picks a select or radio option; an empty option clears a select
    pub fn choose(&mut self, name: &str, option: &str) -> Result<(), InputError> {
        let control = self.editable(name)?;
        if !control.is_choice() {
            return Err(wrong_kind(control, "an option"));
        }
        let clears_select =
            option.is_empty() && control.kind == ControlKind::Field(FieldType::Select);
        if !clears_select && !control.options.iter().any(|o| o == option) {
            return Err(InputError::UnknownOption {
                name: name.to_string(),
                option: option.to_string(),
            });
        }
        self.values.insert(name.to_string(), FieldValue::Text(option.to_string()));
        Ok(())
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), InputError> {
        let control = self.editable(name)?;
        if !control.is_checkable() {
            return Err(wrong_kind(control, "checking"));
        }
        self.values.insert(name.to_string(), FieldValue::Checked(checked));
        Ok(())
    }

    pub fn attach(&mut self, name: &str, file_name: impl Into<String>) -> Result<(), InputError> {
        let control = self.editable(name)?;
        if control.kind != ControlKind::Field(FieldType::File) {
            return Err(wrong_kind(control, "files"));
        }
        self.values.insert(name.to_string(), FieldValue::Files(vec![file_name.into()]));
        Ok(())
    }

    fn editable(&self, name: &str) -> Result<&Control, InputError> {
        if !matches!(self.state, SessionState::Editing) {
            return Err(InputError::Locked);
        }
        self.model
            .control(name)
            .ok_or_else(|| InputError::UnknownControl(name.to_string()))
    }

    // -- transitions --------------------------------------------------------

    pub fn next(&mut self) -> Result<u32, TransitionError> {
        self.ensure_editing()?;
        if self.current_step >= self.model.total_steps() {
            return Err(TransitionError::NoNextStep(self.current_step));
        }
        self.validate(Some(self.current_step))
            .map_err(TransitionError::Invalid)?;
        self.current_step += 1;
        debug!(step = self.current_step, "advanced to step");
        Ok(self.current_step)
    }

    /// Going back never validates and clears any error indicators
    pub fn prev(&mut self) -> Result<u32, TransitionError> {
        self.ensure_editing()?;
        if self.current_step <= 1 {
            return Err(TransitionError::NoPreviousStep(self.current_step));
        }
        self.clear_errors();
        self.current_step -= 1;
        Ok(self.current_step)
    }

    /// Validates the whole form and enters `Submitting`, returning the
    /// collected payload
    pub fn begin_submit(&mut self) -> Result<FormPayload, TransitionError> {
        self.ensure_editing()?;
        let last = self.model.total_steps();
        if self.current_step != last {
            return Err(TransitionError::NotOnLastStep {
                current: self.current_step,
                last,
            });
        }
        self.validate(None).map_err(TransitionError::Invalid)?;
        self.state = SessionState::Submitting;
        Ok(self.collect())
    }

    /// Settles an in-flight submission
    pub fn finish_submit(&mut self, result: &Result<SubmissionOutcome, SubmissionError>) {
        if !matches!(self.state, SessionState::Submitting) {
            return;
        }
        match result {
            Ok(outcome) => {
                self.values = initial_values(&self.model);
                self.clear_errors();
                self.state = SessionState::Completed(outcome.clone());
            }
            Err(_) => {
                self.state = SessionState::Editing;
                self.message = Some(SessionMessage {
                    kind: MessageKind::Failure,
                    text: self.model.messages().failure.clone(),
                });
            }
        }
    }

    /// Runs the full submit transition through `pipeline`
    pub async fn submit(
        &mut self,
        pipeline: &SubmissionPipeline,
        user_agent: &str,
    ) -> Result<SubmissionOutcome, TransitionError> {
        let payload = self.begin_submit()?;
        let result = pipeline.submit(payload, user_agent).await;
        self.finish_submit(&result);
        Ok(result?)
    }

    fn ensure_editing(&self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Editing => Ok(()),
            SessionState::Submitting => Err(TransitionError::Busy),
            SessionState::Completed(_) => Err(TransitionError::Completed),
        }
    }

    /// Checks every control on `step`, or the whole form when `None`
    fn validate(&mut self, step: Option<u32>) -> Result<(), ValidationFailure> {
        self.clear_errors();

        let mut invalid = Vec::new();
        let mut first: Option<(String, Validity)> = None;
        for control in self.model.controls() {
            if step.is_some_and(|s| control.step != s) {
                continue;
            }
            let validity = control.check(self.values.get(&control.name));
            if validity.is_valid() {
                continue;
            }
            if first.is_none() {
                first = Some((control.name.clone(), validity));
            }
            self.error_groups.push((control.name.clone(), control.group()));
            invalid.push(control.name.clone());
        }

        let Some((first_invalid, validity)) = first else {
            return Ok(());
        };
        self.message = Some(SessionMessage {
            kind: MessageKind::Validation,
            text: self.model.messages().validation.clone(),
        });
        self.focused = Some(first_invalid.clone());
        Err(ValidationFailure {
            first_invalid,
            validity,
            invalid,
        })
    }

    fn clear_errors(&mut self) {
        self.error_groups.clear();
        self.message = None;
        self.focused = None;
    }

    /// Form data as the browser would serialize it, minus consent keys
    fn collect(&self) -> FormPayload {
        self.model
            .controls()
            .iter()
            .filter_map(|c| {
                c.submitted_value(self.values.get(&c.name))
                    .map(|v| (c.name.clone(), v))
            })
            .collect()
    }
}

fn initial_values(model: &FormModel) -> BTreeMap<String, FieldValue> {
    model
        .controls()
        .iter()
        .filter_map(|c| c.initial_value().map(|v| (c.name.clone(), v)))
        .collect()
}

fn wrong_kind(control: &Control, operation: &'static str) -> InputError {
    InputError::WrongKind {
        name: control.name.clone(),
        operation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::value_objects::{FieldDefinition, LayoutAssignment};
    use crate::domain::{FormConfig, ServiceDefinition};
    use crate::infrastructure::persistence::InMemoryLeadStore;
    use crate::ports::outbound::IpLookup;
    use crate::submission::tests::{FailingStore, FixedIp};
    use crate::submission::LeadContext;

    fn service() -> ServiceDefinition {
        ServiceDefinition::new(
            "consulenza",
            vec![
                FieldDefinition::new("nome", "Nome", FieldType::Text).required(),
                FieldDefinition::new("email", "Email", FieldType::Email).required(),
                FieldDefinition::new("contatto", "Preferenza", FieldType::Radio)
                    .required()
                    .with_options(["Email", "Telefono"]),
            ],
        )
    }

    fn multi_step_config() -> FormConfig {
        let mut config = FormConfig::new("consulenza", "tenant-1");
        config.multi_step = true;
        config.assign("email", LayoutAssignment::on_step(2));
        config.assign("contatto", LayoutAssignment::on_step(2));
        config.consent.privacy_enabled = true;
        config
    }

    fn pipeline(config: &FormConfig, store: Arc<dyn crate::ports::outbound::LeadStore>) -> SubmissionPipeline {
        let ip: Arc<dyn IpLookup> = Arc::new(FixedIp("203.0.113.7"));
        SubmissionPipeline::new(LeadContext::from_config(config), ip, store)
    }

    #[test]
    fn test_next_blocked_by_empty_required_field() {
        let mut session = FormSession::new(FormModel::build(&service(), &multi_step_config()));
        assert_eq!(session.model().total_steps(), 3);

        let err = session.next().unwrap_err();
        match err {
            TransitionError::Invalid(failure) => {
                assert_eq!(failure.first_invalid, "nome");
                assert_eq!(failure.validity, Validity::ValueMissing);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.current_step(), 1);
        assert_eq!(session.focused(), Some("nome"));
        assert_eq!(session.message().unwrap().kind, MessageKind::Validation);
    }

    #[test]
    fn test_walk_forward_and_back() {
        let mut session = FormSession::new(FormModel::build(&service(), &multi_step_config()));
        session.fill("nome", "Mario").unwrap();
        assert_eq!(session.next().unwrap(), 2);

        // both invalid groups on step 2 are marked, focus goes to the first
        let err = session.next().unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(_)));
        assert_eq!(
            session.error_groups(),
            &[
                ("email".to_string(), ErrorGroup::Field),
                ("contatto".to_string(), ErrorGroup::RadioGroup),
            ]
        );
        assert_eq!(session.focused(), Some("email"));

        assert_eq!(session.prev().unwrap(), 1);
        assert!(session.error_groups().is_empty());
        assert!(session.message().is_none());
        assert!(matches!(session.prev(), Err(TransitionError::NoPreviousStep(1))));
    }

    #[test]
    fn test_submit_only_from_last_step() {
        let mut session = FormSession::new(FormModel::build(&service(), &multi_step_config()));
        assert!(matches!(
            session.begin_submit(),
            Err(TransitionError::NotOnLastStep { current: 1, last: 3 })
        ));
    }

    #[test]
    fn test_consent_gates_submission() {
        let mut session = FormSession::new(FormModel::build(&service(), &multi_step_config()));
        session.fill("nome", "Mario").unwrap();
        session.next().unwrap();
        session.fill("email", "mario@example.it").unwrap();
        session.choose("contatto", "Email").unwrap();
        session.next().unwrap();

        let err = session.begin_submit().unwrap_err();
        match err {
            TransitionError::Invalid(failure) => assert_eq!(failure.invalid, vec!["privacy_consent"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.error_groups()[0].1, ErrorGroup::CheckboxWrapper);
        assert_eq!(session.state(), &SessionState::Editing);

        session.set_checked("privacy_consent", true).unwrap();
        let payload = session.begin_submit().unwrap();
        assert!(!payload.contains_key("privacy_consent"));
        assert_eq!(payload.get("contatto"), Some("Email"));
        assert_eq!(session.state(), &SessionState::Submitting);
        assert!(!session.submit_enabled());
        assert_eq!(session.submit_label(), "Sending…");
        assert!(matches!(session.next(), Err(TransitionError::Busy)));
        assert_eq!(session.fill("nome", "x"), Err(InputError::Locked));
    }

    #[test]
    fn test_three_field_single_step_form() {
        let service = ServiceDefinition::new(
            "consulenza",
            vec![
                FieldDefinition::new("nome", "Nome", FieldType::Text).required(),
                FieldDefinition::new("telefono", "Telefono", FieldType::Tel),
                FieldDefinition::new("email", "Email", FieldType::Email),
            ],
        );
        let config = FormConfig::new("consulenza", "tenant-1");
        let mut session = FormSession::new(FormModel::build(&service, &config));

        let err = session.begin_submit().unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(ref f) if f.invalid == vec!["nome"]));
        assert_eq!(session.focused(), Some("nome"));

        session.fill("nome", "Mario").unwrap();
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.get("nome"), Some("Mario"));
        assert_eq!(payload.get("telefono"), Some(""));
        assert!(session.message().is_none());
    }

    #[test]
    fn test_five_fields_over_three_steps() {
        let fields = ["a", "b", "c", "d", "e"]
            .map(|n| FieldDefinition::new(n, n.to_uppercase(), FieldType::Text).required());
        let service = ServiceDefinition::new("svc", fields.to_vec());
        let mut config = FormConfig::new("svc", "tenant-1");
        config.multi_step = true;
        config.assign("c", LayoutAssignment::on_step(2));
        config.assign("d", LayoutAssignment::on_step(2));
        config.assign("e", LayoutAssignment::on_step(3));
        config.consent.privacy_enabled = true;

        let mut session = FormSession::new(FormModel::build(&service, &config));
        assert_eq!(session.model().total_steps(), 4);

        match session.next().unwrap_err() {
            TransitionError::Invalid(f) => assert_eq!(f.invalid, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
        for (step, names) in [(1, vec!["a", "b"]), (2, vec!["c", "d"]), (3, vec!["e"])] {
            assert_eq!(session.current_step(), step);
            for name in names {
                session.fill(name, "x").unwrap();
            }
            session.next().unwrap();
        }
        assert_eq!(session.current_step(), 4);
        assert!(matches!(session.next(), Err(TransitionError::NoNextStep(4))));

        match session.begin_submit().unwrap_err() {
            TransitionError::Invalid(f) => assert_eq!(f.invalid, vec!["privacy_consent"]),
            other => panic!("unexpected error: {other}"),
        }
        session.set_checked("privacy_consent", true).unwrap();
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn test_input_errors() {
        let mut session = FormSession::new(FormModel::build(&service(), &multi_step_config()));
        assert_eq!(
            session.fill("missing", "x"),
            Err(InputError::UnknownControl("missing".into()))
        );
        assert!(matches!(session.fill("contatto", "x"), Err(InputError::WrongKind { .. })));
        assert!(matches!(session.choose("contatto", "Fax"), Err(InputError::UnknownOption { .. })));
        assert!(matches!(session.set_checked("nome", true), Err(InputError::WrongKind { .. })));
    }

    #[tokio::test]
    async fn test_single_step_submission_completes_and_resets() {
        let mut config = FormConfig::new("consulenza", "tenant-1");
        config.style.success_message = Some("Grazie!".into());
        let store = Arc::new(InMemoryLeadStore::new());
        let pipeline = pipeline(&config, store.clone());

        let mut session = FormSession::new(FormModel::build(&service(), &config));
        assert_eq!(session.model().total_steps(), 1);
        session.fill("nome", "Mario").unwrap();
        session.fill("email", "mario@example.it").unwrap();
        session.choose("contatto", "Telefono").unwrap();

        let outcome = session.submit(&pipeline, "test-agent").await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::InlineSuccess("Grazie!".into()));
        assert_eq!(session.state(), &SessionState::Completed(outcome));
        assert!(session.value("nome").is_none());

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].data.get("nome"), Some("Mario"));
        assert_eq!(rows[0].data.get("ip_address"), Some("203.0.113.7"));
        assert!(matches!(
            session.submit(&pipeline, "test-agent").await,
            Err(TransitionError::Completed)
        ));
    }

    #[tokio::test]
    async fn test_failed_submission_allows_retry() {
        let config = FormConfig::new("consulenza", "tenant-1");
        let pipeline = pipeline(&config, Arc::new(FailingStore));

        let mut session = FormSession::new(FormModel::build(&service(), &config));
        session.fill("nome", "Mario").unwrap();
        session.fill("email", "mario@example.it").unwrap();
        session.choose("contatto", "Email").unwrap();

        let err = session.submit(&pipeline, "ua").await.unwrap_err();
        assert!(matches!(err, TransitionError::Submission(_)));
        assert_eq!(session.state(), &SessionState::Editing);
        assert_eq!(session.message().unwrap().kind, MessageKind::Failure);
        assert!(session.submit_enabled());
        assert_eq!(session.submit_label(), "Submit");
        assert_eq!(session.value("nome"), Some(&FieldValue::Text("Mario".into())));
    }
}
