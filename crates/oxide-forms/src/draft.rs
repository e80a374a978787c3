//! The form under construction and the operations that edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::FieldType;
use crate::field::{Field, FieldUpdate};
use crate::ids::{FieldId, FormId};

/// Publication state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    /// Not reachable through the public endpoint.
    #[default]
    Draft,
    /// Accepting public submissions.
    Published,
}

impl FormStatus {
    /// Returns the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    /// Form title.
    pub title: String,
    /// Description shown under the title.
    #[serde(default)]
    pub description: String,
    /// Message shown after a successful submission.
    #[serde(default = "default_thank_you")]
    pub thank_you_message: String,
    /// Maximum number of submissions; 0 means unlimited.
    #[serde(default)]
    pub submission_limit: u32,
}

fn default_thank_you() -> String {
    "Thank you for your submission!".to_string()
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            title: "Untitled Form".to_string(),
            description: "Form description".to_string(),
            thank_you_message: default_thank_you(),
            submission_limit: 0,
        }
    }
}

/// A partial update of [`FormSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New thank-you message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thank_you_message: Option<String>,
    /// New submission limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_limit: Option<u32>,
}

impl SettingsUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the thank-you message.
    #[must_use]
    pub fn thank_you_message(mut self, message: impl Into<String>) -> Self {
        self.thank_you_message = Some(message.into());
        self
    }

    /// Sets the submission limit.
    #[must_use]
    pub fn submission_limit(mut self, limit: u32) -> Self {
        self.submission_limit = Some(limit);
        self
    }
}

/// In-memory model of a form being built.
///
/// Field order is the rendering and submission order. Every operation here
/// is total: unknown ids, same-index moves and attempts to drop the last
/// option leave the draft untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    /// Assigned by the form service on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FormId>,
    /// Form settings.
    #[serde(default)]
    pub settings: FormSettings,
    /// Ordered fields.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Publication state.
    #[serde(default)]
    pub status: FormStatus,
}

impl FormDraft {
    /// Creates an empty, unsaved draft with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position of a field.
    pub fn index_of(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    /// Returns a field by id.
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    /// Adds a field of the given type at `at` (clamped to the end) or at the
    /// end, and returns its id.
    pub fn add_field(&mut self, field_type: FieldType, at: Option<usize>) -> FieldId {
        let field = Field::new(field_type);
        let id = field.id.clone();
        let index = at.map_or(self.fields.len(), |i| i.min(self.fields.len()));
        self.fields.insert(index, field);
        id
    }

    /// Removes a field and returns it.
    pub fn remove_field(&mut self, id: &FieldId) -> Option<Field> {
        let index = self.index_of(id)?;
        Some(self.fields.remove(index))
    }

    /// Moves an existing field to `to` (clamped to the end). Returns whether
    /// the order changed.
    pub fn reorder_field(&mut self, id: &FieldId, to: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        if from == to {
            return false;
        }
        let field = self.fields.remove(from);
        let to = to.min(self.fields.len());
        self.fields.insert(to, field);
        from != to
    }

    /// Merges a partial update into a field.
    pub fn update_field(&mut self, id: &FieldId, update: FieldUpdate) {
        if let Some(field) = self.field_mut(id) {
            field.apply(update);
        }
    }

    /// Appends a default option to a field.
    pub fn add_option(&mut self, id: &FieldId) {
        if let Some(field) = self.field_mut(id) {
            field.add_option();
        }
    }

    /// Replaces one option of a field.
    pub fn update_option(&mut self, id: &FieldId, index: usize, value: impl Into<String>) {
        if let Some(field) = self.field_mut(id) {
            if !field.update_option(index, value) {
                warn!(field = %id, index, "option index out of range, update ignored");
            }
        }
    }

    /// Removes one option of a field unless it is the last one.
    pub fn remove_option(&mut self, id: &FieldId, index: usize) {
        if let Some(field) = self.field_mut(id) {
            field.remove_option(index);
        }
    }

    /// Merges settings.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(title) = update.title {
            self.settings.title = title;
        }
        if let Some(description) = update.description {
            self.settings.description = description;
        }
        if let Some(message) = update.thank_you_message {
            self.settings.thank_you_message = message;
        }
        if let Some(limit) = update.submission_limit {
            self.settings.submission_limit = limit;
        }
    }

    /// Returns whether the form accepts public submissions.
    pub fn is_published(&self) -> bool {
        self.status == FormStatus::Published
    }

    /// Returns a copy with fresh field ids, no form id and draft status.
    pub fn duplicate(&self) -> Self {
        Self {
            id: None,
            settings: FormSettings {
                title: format!("{} (Copy)", self.settings.title),
                ..self.settings.clone()
            },
            fields: self.fields.iter().map(Field::duplicate).collect(),
            status: FormStatus::Draft,
        }
    }

    /// Repairs fields loaded from an external source so the option
    /// invariant holds, replaces ids that are not plain tokens, and drops
    /// fields whose id repeats an earlier one.
    pub fn normalize(&mut self) {
        for field in &mut self.fields {
            field.normalize();
        }
        let mut seen = std::collections::HashSet::new();
        self.fields.retain(|f| seen.insert(f.id.clone()));
    }
}

/// A persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Form id.
    pub id: FormId,
    /// Form settings.
    pub settings: FormSettings,
    /// Ordered fields.
    pub fields: Vec<Field>,
    /// Publication state.
    pub status: FormStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Creates a stored form from a draft.
    pub fn from_draft(id: FormId, draft: FormDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            settings: draft.settings,
            fields: draft.fields,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns an editable draft of this form.
    pub fn to_draft(&self) -> FormDraft {
        FormDraft {
            id: Some(self.id.clone()),
            settings: self.settings.clone(),
            fields: self.fields.clone(),
            status: self.status,
        }
    }

    /// Returns whether the form accepts public submissions.
    pub fn is_published(&self) -> bool {
        self.status == FormStatus::Published
    }

    /// Looks up a field by id.
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }
}
