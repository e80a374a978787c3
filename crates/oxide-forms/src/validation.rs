//! Field validators and the per-type validation rules.
//!
//! | Type | Rule |
//! |------|------|
//! | text, textarea | required: non-empty |
//! | select, radio | required: non-empty |
//! | email | required: non-empty; when present, looks like `local@domain.tld` |
//! | checkbox | required: at least one selection |
//! | file | required: a file is attached |
//! | unsupported | never fails |

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::FieldType;
use crate::error::ValidationErrors;
use crate::field::Field;
use crate::ids::FieldId;
use crate::value::FieldValue;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const INVALID_VALUE: &str = "Invalid value.";

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator that requires a non-empty value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "This field is required.".to_string(),
        }
    }

    /// Creates a RequiredValidator naming the field in its message.
    pub fn for_label(label: &str) -> Self {
        Self::with_message(format!("{label} is required"))
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "Please enter a valid email address".to_string(),
        }
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validates the value entered for one field.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> Result<(), String> {
    let required = RequiredValidator::for_label(&field.label);

    match &field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Radio => {
            check_text(field, value, &required, &[])
        }
        FieldType::Email => check_text(field, value, &required, &[&EmailValidator::new()]),
        FieldType::Checkbox => check_choices(field, value, &required),
        FieldType::File => check_file(field, value, &required),
        FieldType::Unsupported(_) => Ok(()),
    }
}

/// Validates every field of a form against the entered values.
pub fn validate_form(fields: &[Field], values: &HashMap<FieldId, FieldValue>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in fields {
        if let Err(message) = validate_field(field, values.get(&field.id)) {
            errors.add(&field.id, message);
        }
    }
    errors
}

fn check_text(
    field: &Field,
    value: Option<&FieldValue>,
    required: &RequiredValidator,
    validators: &[&dyn Validator],
) -> Result<(), String> {
    let text = match value {
        None => "",
        Some(FieldValue::Text(s)) => s.as_str(),
        Some(_) => return Err(INVALID_VALUE.to_string()),
    };

    if field.required {
        required.validate(text)?;
    }
    if text.is_empty() {
        return Ok(());
    }
    validators.iter().try_for_each(|v| v.validate(text))
}

fn check_choices(
    field: &Field,
    value: Option<&FieldValue>,
    required: &RequiredValidator,
) -> Result<(), String> {
    let selected: &[String] = match value {
        None => &[],
        Some(FieldValue::Choices(values)) => values,
        Some(_) => return Err(INVALID_VALUE.to_string()),
    };

    if field.required && selected.is_empty() {
        return Err(required.message().to_string());
    }
    Ok(())
}

fn check_file(
    field: &Field,
    value: Option<&FieldValue>,
    required: &RequiredValidator,
) -> Result<(), String> {
    match value {
        Some(FieldValue::File(file)) if !file.filename.is_empty() => Ok(()),
        Some(FieldValue::File(_)) | None if field.required => Err(required.message().to_string()),
        Some(FieldValue::File(_)) | None => Ok(()),
        Some(_) => Err(INVALID_VALUE.to_string()),
    }
}
