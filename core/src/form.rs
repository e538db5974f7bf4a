use std::fmt;

use tracing::debug;

use crate::targets;
use crate::{FormError, RecordId};

/// String-typed staging copy of a record's editable fields.
///
/// Joined and derived fields are never part of a draft; they come back from
/// the server after submission.
pub trait Draft: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    type Record;
    type Payload;
    type Field: fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static;

    fn from_record(record: &Self::Record) -> Self;

    fn field(&self, field: Self::Field) -> &str;

    fn set_field(&mut self, field: Self::Field, value: String);

    /// Coerces the draft into a typed payload, failing on the first field
    /// that does not parse.
    fn build_payload(&self) -> Result<Self::Payload, FormError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(RecordId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenForm<D> {
    pub mode: FormMode,
    pub draft: D,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<D> {
    Closed,
    Open(OpenForm<D>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission<P> {
    Create(P),
    Update(RecordId, P),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormController<D> {
    state: FormState<D>,
}

impl<D> Default for FormController<D> {
    fn default() -> Self {
        Self {
            state: FormState::Closed,
        }
    }
}

impl<D: Draft> FormController<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState<D> {
        &self.state
    }

    pub fn open(&self) -> Option<&OpenForm<D>> {
        match &self.state {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open().is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.open().is_some_and(|form| form.submitting)
    }

    pub fn draft(&self) -> Option<&D> {
        self.open().map(|form| &form.draft)
    }

    pub fn error(&self) -> Option<&str> {
        self.open().and_then(|form| form.error.as_deref())
    }

    /// Opens an empty create form. Refused while a submission is in flight.
    pub fn open_create(&mut self) -> bool {
        if self.is_submitting() {
            debug!(target: targets::FORM, "Create form refused while submitting");
            return false;
        }
        debug!(target: targets::FORM, "Form opened for create");
        self.state = FormState::Open(OpenForm {
            mode: FormMode::Creating,
            draft: D::default(),
            error: None,
            submitting: false,
        });
        true
    }

    pub fn open_edit(&mut self, id: RecordId, record: &D::Record) -> bool {
        if self.is_submitting() {
            debug!(target: targets::FORM, id = %id, "Edit form refused while submitting");
            return false;
        }
        debug!(target: targets::FORM, id = %id, "Form opened for edit");
        self.state = FormState::Open(OpenForm {
            mode: FormMode::Editing(id),
            draft: D::from_record(record),
            error: None,
            submitting: false,
        });
        true
    }

    /// Closes the form unless a submission is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.state = FormState::Closed;
        true
    }

    pub fn set_field(&mut self, field: D::Field, value: String) {
        if let FormState::Open(form) = &mut self.state {
            form.draft.set_field(field, value);
        }
    }

    /// Validates the draft and marks the form as submitting.
    ///
    /// Returns `None` when the form is closed, already submitting, or the
    /// draft fails local validation; the latter lands in the error slot.
    pub fn begin_submit(&mut self) -> Option<Submission<D::Payload>> {
        let FormState::Open(form) = &mut self.state else {
            return None;
        };
        if form.submitting {
            debug!(target: targets::FORM, "Duplicate submit ignored");
            return None;
        }

        match form.draft.build_payload() {
            Ok(payload) => {
                form.error = None;
                form.submitting = true;
                Some(match form.mode {
                    FormMode::Creating => Submission::Create(payload),
                    FormMode::Editing(id) => Submission::Update(id, payload),
                })
            }
            Err(error) => {
                debug!(
                    target: targets::FORM,
                    field = error.field,
                    "Draft rejected: {}",
                    error.message
                );
                form.error = Some(error.message);
                None
            }
        }
    }

    /// Folds the server's answer back in: success closes the form, failure
    /// keeps the draft and shows `message`.
    pub fn finish_submit(&mut self, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.state = FormState::Closed,
            Err(message) => {
                if let FormState::Open(form) = &mut self.state {
                    form.submitting = false;
                    form.error = Some(message);
                }
            }
        }
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.open().map(|form| form.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{LocationDraft, LocationField};
    use crate::{Location, LocationPayload};

    fn location(id: u64) -> Location {
        Location {
            id: RecordId(id),
            name: "Main School".to_string(),
            address: "1 School Road".to_string(),
            items: 12,
            printers: 2,
        }
    }

    #[test]
    fn create_flow_builds_create_submission() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_create();
        form.set_field(LocationField::Name, "Branch School A".to_string());
        form.set_field(LocationField::Address, "2 Side Street".to_string());

        let submission = form.begin_submit().expect("submission");
        assert_eq!(
            submission,
            Submission::Create(LocationPayload {
                name: "Branch School A".to_string(),
                address: "2 Side Street".to_string(),
            })
        );
        assert!(form.is_submitting());
    }

    #[test]
    fn edit_seeds_draft_from_record() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_edit(RecordId(9), &location(9));

        let draft = form.draft().expect("draft");
        assert_eq!(draft.field(LocationField::Name), "Main School");
        assert_eq!(form.mode(), Some(FormMode::Editing(RecordId(9))));
        assert!(matches!(
            form.begin_submit(),
            Some(Submission::Update(RecordId(9), _))
        ));
    }

    #[test]
    fn duplicate_submit_is_ignored_while_in_flight() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_edit(RecordId(1), &location(1));

        assert!(form.begin_submit().is_some());
        assert!(form.begin_submit().is_none());
        assert!(!form.cancel());
    }

    #[test]
    fn in_flight_form_cannot_be_replaced() {
        let mut form = FormController::<LocationDraft>::new();
        assert!(form.open_create());
        form.set_field(LocationField::Name, "Branch School B".to_string());
        form.begin_submit().expect("submission");

        assert!(!form.open_edit(RecordId(2), &location(2)));
        assert!(!form.open_create());

        assert!(form.is_submitting());
        assert_eq!(form.mode(), Some(FormMode::Creating));
        assert_eq!(
            form.draft().map(|draft| draft.field(LocationField::Name)),
            Some("Branch School B")
        );
    }

    #[test]
    fn local_validation_blocks_submission() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_create();

        assert!(form.begin_submit().is_none());
        assert!(!form.is_submitting());
        assert!(form.error().is_some());
    }

    #[test]
    fn failed_submission_keeps_draft_and_reports_error() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_create();
        form.set_field(LocationField::Name, "Main School".to_string());
        form.begin_submit().expect("submission");

        form.finish_submit(Err("Location already exists".to_string()));

        assert!(form.is_open());
        assert!(!form.is_submitting());
        assert_eq!(form.error(), Some("Location already exists"));
        assert_eq!(
            form.draft().map(|draft| draft.field(LocationField::Name)),
            Some("Main School")
        );
    }

    #[test]
    fn successful_submission_closes_form() {
        let mut form = FormController::<LocationDraft>::new();
        form.open_edit(RecordId(1), &location(1));
        form.begin_submit().expect("submission");

        form.finish_submit(Ok(()));

        assert_eq!(form.state(), &FormState::Closed);
    }
}
