//! # oxide-forms
//!
//! Drag-and-drop form builder model with Bootstrap 5 rendering and
//! submission validation.
//!
//! This crate provides:
//! - A catalog of field types and their capabilities
//! - An editable form draft and a drag-and-drop engine over it
//! - Per-type validation and Bootstrap 5 widgets
//! - Submission assembly and CSV export
//! - Service traits for storing forms and submissions
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_forms::{BuilderCommand, FieldType, FormEditor, SettingsUpdate};
//!
//! let mut editor = FormEditor::new();
//! editor.apply(BuilderCommand::UpdateSettings(
//!     SettingsUpdate::new().title("Contact"),
//! ));
//!
//! // Drag a text input and an email input from the palette.
//! editor.apply(BuilderCommand::StartPaletteDrag(FieldType::Text));
//! editor.apply(BuilderCommand::Drop(None));
//! editor.apply(BuilderCommand::StartPaletteDrag(FieldType::Email));
//! editor.apply(BuilderCommand::Drop(Some(0)));
//!
//! let draft = editor.draft();
//! assert_eq!(draft.fields.len(), 2);
//! assert_eq!(draft.fields[0].field_type, FieldType::Email);
//! ```
//!
//! ## Validation
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use oxide_forms::{validate_form, Field, FieldType, FieldValue};
//!
//! let mut email = Field::new(FieldType::Email);
//! email.required = true;
//!
//! let mut values = HashMap::new();
//! values.insert(email.id.clone(), FieldValue::text("not-an-email"));
//!
//! let errors = validate_form(&[email.clone()], &values);
//! assert_eq!(errors.get(&email.id), Some("Please enter a valid email address"));
//! ```
//!
//! ## Widgets
//!
//! Every field type maps to one Bootstrap 5 widget:
//! - `BootstrapTextInput` - Text and email inputs
//! - `BootstrapTextarea` - Multi-line text input
//! - `BootstrapSelect` - Dropdown select
//! - `BootstrapRadioSelect` - Radio button group
//! - `BootstrapCheckboxGroup` - Checkbox group
//! - `BootstrapFileInput` - File input with preview
//! - `UnsupportedNotice` - Marker for unknown field types

pub mod catalog;
mod draft;
pub mod drag;
mod editor;
mod error;
pub mod export;
mod field;
mod ids;
pub mod render;
pub mod service;
mod submission;
pub mod validation;
mod value;
mod viewer;
pub mod widgets;

pub use catalog::{Capabilities, FieldType, PALETTE};
pub use draft::{Form, FormDraft, FormSettings, FormStatus, SettingsUpdate};
pub use drag::{DragEngine, DraggedItem, DropEffect, DropOutcome};
pub use editor::{Applied, BuilderCommand, EditorAction, FormEditor};
pub use error::{
    EditorError, FormError, Result, ServiceError, ServiceResult, SessionError, ValidationErrors,
};
pub use export::{csv_filename, export_csv};
pub use field::{Field, FieldUpdate};
pub use ids::{FieldId, FormId, SubmissionId};
pub use render::{render_canvas, render_field, render_form, render_palette, render_preview};
pub use service::{FormService, FormSummary, SubmissionService, SubmissionStats};
pub use submission::{assemble, Submission, SubmissionPayload};
pub use validation::{validate_field, validate_form};
pub use value::{FieldValue, FileUpload, FileValue};
pub use viewer::PublicFormSession;
