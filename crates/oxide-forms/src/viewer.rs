//! A respondent filling in a published form.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::draft::Form;
use crate::error::{FormError, ServiceError, SessionError, ValidationErrors};
use crate::ids::FieldId;
use crate::render;
use crate::service::SubmissionService;
use crate::submission::{assemble, Submission, SubmissionPayload};
use crate::validation::validate_form;
use crate::value::{FieldValue, FileUpload};
use crate::widgets::html_escape;

/// Values, errors and submission state of one respondent.
#[derive(Debug, Clone)]
pub struct PublicFormSession {
    form: Form,
    values: HashMap<FieldId, FieldValue>,
    errors: ValidationErrors,
    pending: bool,
    submitted: Option<Submission>,
}

impl PublicFormSession {
    /// Opens a session. Only published forms can be filled in.
    pub fn new(form: Form) -> Result<Self, FormError> {
        if !form.is_published() {
            return Err(FormError::NotAvailable(form.id));
        }
        Ok(Self {
            form,
            values: HashMap::new(),
            errors: ValidationErrors::new(),
            pending: false,
            submitted: None,
        })
    }

    /// Returns the form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the entered values.
    pub fn values(&self) -> &HashMap<FieldId, FieldValue> {
        &self.values
    }

    /// Returns the current errors.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns whether a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the stored submission once the form was submitted.
    pub fn submission(&self) -> Option<&Submission> {
        self.submitted.as_ref()
    }

    /// Returns the thank-you message once the form was submitted.
    pub fn thank_you_message(&self) -> Option<&str> {
        self.submitted
            .as_ref()
            .map(|_| self.form.settings.thank_you_message.as_str())
    }

    /// Records a value and clears that field's error. Values for ids that
    /// are not fields of the form are ignored.
    pub fn set_value(&mut self, id: &FieldId, value: FieldValue) -> bool {
        if self.form.field(id).is_none() {
            warn!(field_id = %id, "value for unknown field ignored");
            return false;
        }
        self.values.insert(id.clone(), value);
        self.errors.clear(id);
        true
    }

    /// Attaches a file read from disk to a file field.
    pub fn apply_file(&mut self, id: &FieldId, upload: FileUpload) -> bool {
        self.set_value(id, FieldValue::File(upload.into_value()))
    }

    /// Validates every field, replacing the current errors. Returns whether
    /// the values are valid.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(&self.form.fields, &self.values);
        self.errors.is_empty()
    }

    /// Validates and assembles the payload, marking the submission as in
    /// flight. Pair with [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SessionError> {
        if self.submitted.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.pending {
            return Err(SessionError::Busy);
        }
        if !self.validate() {
            return Err(FormError::ValidationErrors(self.errors.clone()).into());
        }
        self.pending = true;
        Ok(assemble(&self.form.fields, &self.values))
    }

    /// Records the service's answer to a submission. Entered values are
    /// kept on failure so the respondent can retry.
    pub fn finish_submit(
        &mut self,
        result: Result<Submission, ServiceError>,
    ) -> Result<&Submission, SessionError> {
        self.pending = false;
        match result {
            Ok(submission) => {
                info!(form_id = %self.form.id, submission_id = %submission.id, "form submitted");
                Ok(&*self.submitted.insert(submission))
            }
            Err(ServiceError::Invalid(errors)) => {
                self.errors = errors.clone();
                Err(ServiceError::Invalid(errors).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Validates, assembles and submits the entered values.
    pub async fn submit(
        &mut self,
        service: &dyn SubmissionService,
    ) -> Result<&Submission, SessionError> {
        let payload = self.begin_submit()?;
        let result = service.submit(self.form.id.clone(), payload).await;
        self.finish_submit(result)
    }

    /// Renders the form with the entered values and errors, or the
    /// thank-you message after a successful submission.
    pub fn render(&self, action: &str) -> String {
        match self.thank_you_message() {
            Some(message) => format!(
                r#"<div class="alert alert-success" role="status">{}</div>"#,
                html_escape(message)
            ),
            None => render::render_form(&self.form.fields, &self.values, &self.errors, action),
        }
    }
}
