//! A single form field and its configuration rules.

use serde::{Deserialize, Serialize};

use crate::catalog::FieldType;
use crate::ids::FieldId;

/// A field of a form.
///
/// `options` is non-empty exactly when the type has options. The editing
/// methods below never break that: they refuse to remove the last option and
/// ignore option edits on types without options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Identifier, fixed at creation.
    pub id: FieldId,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Label shown next to the input.
    pub label: String,
    /// Whether a value must be provided.
    #[serde(default)]
    pub required: bool,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Choices for select, radio and checkbox fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A partial update of a field's configuration.
///
/// Unset members leave the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New placeholder; an empty string clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// New required flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Replacement option list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Replaces the option list.
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

impl Field {
    /// Creates a field of the given type with its catalog defaults and a
    /// fresh id.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: FieldId::generate(),
            label: field_type.label().to_string(),
            required: false,
            placeholder: field_type.default_placeholder(),
            options: field_type.default_options(),
            field_type,
        }
    }

    /// Returns a deep copy of this field under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: FieldId::generate(),
            ..self.clone()
        }
    }

    /// Returns whether this field carries options.
    pub fn has_options(&self) -> bool {
        self.field_type.capabilities().has_options
    }

    /// Merges a partial update into this field.
    pub fn apply(&mut self, update: FieldUpdate) {
        let caps = self.field_type.capabilities();

        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(required) = update.required {
            self.required = required;
        }
        if let Some(placeholder) = update.placeholder {
            if caps.has_placeholder {
                self.placeholder = (!placeholder.is_empty()).then_some(placeholder);
            }
        }
        if let Some(options) = update.options {
            if caps.has_options && !options.is_empty() {
                self.options = options;
            }
        }
    }

    /// Appends `Option N`, where N is the new option count.
    pub fn add_option(&mut self) {
        if self.has_options() {
            self.options.push(format!("Option {}", self.options.len() + 1));
        }
    }

    /// Replaces the option at `index`. Returns whether anything changed.
    pub fn update_option(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Removes the option at `index` unless it is the last one left.
    /// Returns whether an option was removed.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= 1 || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    /// Brings a field loaded from storage back in line with its type:
    /// options-bearing fields get defaults if their list is empty, other
    /// fields drop stray options. An id that is not a plain token is
    /// replaced by a fresh one.
    pub fn normalize(&mut self) {
        if !self.id.is_token() {
            self.id = FieldId::generate();
        }
        if self.has_options() {
            if self.options.is_empty() {
                self.options = self.field_type.default_options();
            }
        } else {
            self.options.clear();
        }
    }
}
