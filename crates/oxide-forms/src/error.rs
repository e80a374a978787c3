//! Error types for forms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::EditorAction;
use crate::ids::{FieldId, FormId};

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// Validation failed with errors.
    #[error("validation errors: {0}")]
    ValidationErrors(ValidationErrors),

    /// The form has no title.
    #[error("Form title is required")]
    MissingTitle,

    /// The form has not been saved yet.
    #[error("form has not been saved")]
    Unsaved,

    /// The form is not open for public submissions.
    #[error("form {0} is not available")]
    NotAvailable(FormId),
}

/// Field-scoped validation errors: one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    /// Messages keyed by field id.
    pub errors: HashMap<FieldId, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Records the error for a field, replacing any earlier one.
    pub fn add(&mut self, field: &FieldId, message: impl Into<String>) {
        self.errors.insert(field.clone(), message.into());
    }

    /// Clears the error of a single field. Returns whether one was present.
    pub fn clear(&mut self, field: &FieldId) -> bool {
        self.errors.remove(field).is_some()
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &FieldId) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<_> = self.errors.iter().collect();
        entries.sort();
        for (i, (field, message)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Failures reported by the form and submission services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The form or submission does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The form exists but does not accept submissions.
    #[error("This form is not currently accepting submissions")]
    NotPublished,

    /// The form already holds as many submissions as it allows.
    #[error("This form has reached its submission limit")]
    SubmissionLimitReached,

    /// The request was rejected with field-scoped errors.
    #[error("Please correct the errors in the form")]
    Invalid(ValidationErrors),

    /// The request itself is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The service could not be reached; the request may be retried.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Returns whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type alias for service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors of the builder editor session.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The same persistence action is already in flight.
    #[error("{0} is already in progress")]
    Busy(EditorAction),

    /// The draft cannot be persisted as it is.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The form service failed; the draft was left unchanged.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors of a public form session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A submission is already in flight.
    #[error("submission already in progress")]
    Busy,

    /// The form was already submitted from this session.
    #[error("form already submitted")]
    AlreadySubmitted,

    /// The entered values are invalid.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The submission service failed; entered values are kept.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_clear() {
        let a = FieldId::new("a");
        let b = FieldId::new("b");
        let mut errors = ValidationErrors::new();
        errors.add(&a, "Name is required");
        errors.add(&b, "Please enter a valid email address");

        assert_eq!(errors.len(), 2);
        assert!(errors.clear(&a));
        assert!(!errors.clear(&a));
        assert_eq!(errors.get(&b), Some("Please enter a valid email address"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_service_error_messages() {
        assert_eq!(
            ServiceError::NotFound("form abc".into()).to_string(),
            "form abc not found"
        );
        assert!(ServiceError::Unavailable("timeout".into()).is_retryable());
        assert!(!ServiceError::NotPublished.is_retryable());

        let err = EditorError::from(FormError::MissingTitle);
        assert_eq!(err.to_string(), "Form title is required");
    }

    #[test]
    fn test_display_is_sorted() {
        let mut errors = ValidationErrors::new();
        errors.add(&FieldId::new("b"), "second");
        errors.add(&FieldId::new("a"), "first");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
