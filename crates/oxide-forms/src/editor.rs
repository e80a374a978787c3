//! The builder session: one draft, its selection, drag state and the
//! persistence actions driven against a [`FormService`].
//!
//! Every change to the draft goes through [`FormEditor::apply`] with a
//! [`BuilderCommand`], so the draft has a single owner and a single entry
//! point. Persistence only happens on explicit actions (save, publish, ...).

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use crate::catalog::FieldType;
use crate::draft::{Form, FormDraft, FormStatus, SettingsUpdate};
use crate::drag::{DragEngine, DropEffect, DropOutcome};
use crate::error::{EditorError, FormError, ValidationErrors};
use crate::field::{Field, FieldUpdate};
use crate::ids::{FieldId, FormId};
use crate::render;
use crate::service::FormService;

/// A change requested by the builder UI.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCommand {
    /// Adds a field of the given type at an index, or at the end.
    AddField {
        /// Field type.
        field_type: FieldType,
        /// Insertion index.
        at: Option<usize>,
    },
    /// Removes a field.
    RemoveField(FieldId),
    /// Moves a field to another index.
    ReorderField {
        /// Field to move.
        id: FieldId,
        /// Target index.
        to: usize,
    },
    /// Merges a partial update into a field.
    UpdateField {
        /// Field to update.
        id: FieldId,
        /// The update.
        update: FieldUpdate,
    },
    /// Appends a default option.
    AddOption(FieldId),
    /// Replaces one option.
    UpdateOption {
        /// Field to update.
        id: FieldId,
        /// Option index.
        index: usize,
        /// New option text.
        value: String,
    },
    /// Removes one option.
    RemoveOption {
        /// Field to update.
        id: FieldId,
        /// Option index.
        index: usize,
    },
    /// Merges a settings update.
    UpdateSettings(SettingsUpdate),
    /// Selects a field for configuration, or clears the selection.
    Select(Option<FieldId>),
    /// Starts dragging a palette entry.
    StartPaletteDrag(FieldType),
    /// Starts dragging a field on the canvas.
    StartCanvasDrag(FieldId),
    /// Hovers a drop target.
    DragOver(Option<usize>),
    /// Drops the held item.
    Drop(Option<usize>),
    /// Abandons the drag.
    CancelDrag,
    /// Switches between editing and preview.
    TogglePreview,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The command ran; nothing to report.
    Done,
    /// A field was added.
    FieldAdded(FieldId),
    /// Cursor affordance for the hovered target.
    Effect(DropEffect),
    /// Result of a drop.
    Dropped(DropOutcome),
}

/// A persistence action of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    /// Create or update the form.
    Save,
    /// Open for submissions.
    Publish,
    /// Close for submissions.
    Unpublish,
    /// Delete the form.
    Delete,
    /// Copy the form.
    Duplicate,
}

impl fmt::Display for EditorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Save => "save",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Delete => "delete",
            Self::Duplicate => "duplicate",
        };
        f.write_str(name)
    }
}

/// A builder session over one form draft.
#[derive(Debug, Default)]
pub struct FormEditor {
    draft: FormDraft,
    selected: Option<FieldId>,
    drag: DragEngine,
    preview: bool,
    pending: HashSet<EditorAction>,
}

impl FormEditor {
    /// Starts editing a new, empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing a stored form.
    pub fn open(form: &Form) -> Self {
        let mut draft = form.to_draft();
        draft.normalize();
        Self {
            draft,
            ..Self::default()
        }
    }

    /// Returns the draft.
    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    /// Consumes the editor, returning the draft.
    pub fn into_draft(self) -> FormDraft {
        self.draft
    }

    /// Returns the selected field.
    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.as_ref().and_then(|id| self.draft.field(id))
    }

    /// Returns whether preview mode is on.
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Returns the drag state.
    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    /// Returns whether an action is in flight.
    pub fn is_pending(&self, action: EditorAction) -> bool {
        self.pending.contains(&action)
    }

    /// Applies one command to the session.
    pub fn apply(&mut self, command: BuilderCommand) -> Applied {
        debug!(?command, "builder command");
        match command {
            BuilderCommand::AddField { field_type, at } => {
                return Applied::FieldAdded(self.draft.add_field(field_type, at));
            }
            BuilderCommand::RemoveField(id) => {
                self.draft.remove_field(&id);
                if self.selected.as_ref() == Some(&id) {
                    self.selected = None;
                }
            }
            BuilderCommand::ReorderField { id, to } => {
                self.draft.reorder_field(&id, to);
            }
            BuilderCommand::UpdateField { id, update } => self.draft.update_field(&id, update),
            BuilderCommand::AddOption(id) => self.draft.add_option(&id),
            BuilderCommand::UpdateOption { id, index, value } => {
                self.draft.update_option(&id, index, value)
            }
            BuilderCommand::RemoveOption { id, index } => self.draft.remove_option(&id, index),
            BuilderCommand::UpdateSettings(update) => self.draft.update_settings(update),
            BuilderCommand::Select(id) => {
                self.selected = id.filter(|id| self.draft.index_of(id).is_some());
            }
            BuilderCommand::StartPaletteDrag(field_type) => self.drag.start_palette(field_type),
            BuilderCommand::StartCanvasDrag(id) => {
                if let Some(field) = self.draft.field(&id) {
                    self.drag.start_canvas(field.clone());
                }
            }
            BuilderCommand::DragOver(target) => {
                return Applied::Effect(self.drag.drag_over(target));
            }
            BuilderCommand::Drop(target) => {
                return Applied::Dropped(self.drag.drop(&mut self.draft, target));
            }
            BuilderCommand::CancelDrag => self.drag.cancel(),
            BuilderCommand::TogglePreview => self.preview = !self.preview,
        }
        Applied::Done
    }

    /// Renders the canvas, or the form as respondents will see it when
    /// preview mode is on.
    pub fn render(&self) -> String {
        if self.preview {
            render::render_form(
                &self.draft.fields,
                &Default::default(),
                &ValidationErrors::new(),
                "#",
            )
        } else {
            render::render_canvas(&self.draft.fields, self.selected.as_ref())
        }
    }

    /// Returns the public URL of the form once it has been saved.
    pub fn public_url(&self, base_url: &str) -> Option<String> {
        self.draft
            .id
            .as_ref()
            .map(|id| format!("{}/form/{id}", base_url.trim_end_matches('/')))
    }

    /// Marks an action as in flight. Fails if it already is.
    pub fn begin(&mut self, action: EditorAction) -> Result<(), EditorError> {
        if !self.pending.insert(action) {
            return Err(EditorError::Busy(action));
        }
        Ok(())
    }

    /// Marks an action as finished.
    pub fn finish(&mut self, action: EditorAction) {
        self.pending.remove(&action);
    }

    /// Creates or updates the form. Requires a non-blank title.
    pub async fn save(&mut self, service: &dyn FormService) -> Result<Form, EditorError> {
        if self.draft.settings.title.trim().is_empty() {
            return Err(FormError::MissingTitle.into());
        }

        self.begin(EditorAction::Save)?;
        let result = match self.draft.id.clone() {
            Some(id) => service.update(id, self.draft.clone()).await,
            None => service.create(self.draft.clone()).await,
        };
        self.finish(EditorAction::Save);

        let form = result?;
        info!(form_id = %form.id, "form saved");
        self.draft.id = Some(form.id.clone());
        Ok(form)
    }

    /// Publishes the saved form.
    pub async fn publish(&mut self, service: &dyn FormService) -> Result<Form, EditorError> {
        let id = self.saved_id()?;
        self.begin(EditorAction::Publish)?;
        let result = service.publish(id).await;
        self.finish(EditorAction::Publish);

        let form = result?;
        info!(form_id = %form.id, "form published");
        self.draft.status = FormStatus::Published;
        Ok(form)
    }

    /// Unpublishes the saved form.
    pub async fn unpublish(&mut self, service: &dyn FormService) -> Result<Form, EditorError> {
        let id = self.saved_id()?;
        self.begin(EditorAction::Unpublish)?;
        let result = service.unpublish(id).await;
        self.finish(EditorAction::Unpublish);

        let form = result?;
        info!(form_id = %form.id, "form unpublished");
        self.draft.status = FormStatus::Draft;
        Ok(form)
    }

    /// Deletes the saved form and resets the session to an empty draft.
    pub async fn delete(&mut self, service: &dyn FormService) -> Result<(), EditorError> {
        let id = self.saved_id()?;
        self.begin(EditorAction::Delete)?;
        let result = service.delete(id.clone()).await;
        self.finish(EditorAction::Delete);

        result?;
        info!(form_id = %id, "form deleted");
        self.draft = FormDraft::new();
        self.selected = None;
        self.drag.cancel();
        Ok(())
    }

    /// Stores a copy of the saved form. The session keeps editing the
    /// original.
    pub async fn duplicate(&mut self, service: &dyn FormService) -> Result<Form, EditorError> {
        let id = self.saved_id()?;
        self.begin(EditorAction::Duplicate)?;
        let result = service.duplicate(id).await;
        self.finish(EditorAction::Duplicate);

        let copy = result?;
        info!(form_id = %copy.id, "form duplicated");
        Ok(copy)
    }

    fn saved_id(&self) -> Result<FormId, EditorError> {
        self.draft
            .id
            .clone()
            .ok_or_else(|| FormError::Unsaved.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::IgnoredDrop;

    fn editor_with(types: &[FieldType]) -> (FormEditor, Vec<FieldId>) {
        let mut editor = FormEditor::new();
        let ids = types
            .iter()
            .map(|t| match editor.apply(BuilderCommand::AddField {
                field_type: t.clone(),
                at: None,
            }) {
                Applied::FieldAdded(id) => id,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        (editor, ids)
    }

    #[test]
    fn test_remove_clears_selection() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);
        editor.apply(BuilderCommand::Select(Some(ids[1].clone())));
        assert_eq!(editor.selected_field().map(|f| &f.id), Some(&ids[1]));

        editor.apply(BuilderCommand::RemoveField(ids[0].clone()));
        assert!(editor.selected_field().is_some());

        editor.apply(BuilderCommand::RemoveField(ids[1].clone()));
        assert!(editor.selected_field().is_none());
    }

    #[test]
    fn test_select_unknown_field_clears() {
        let (mut editor, ids) = editor_with(&[FieldType::Text]);
        editor.apply(BuilderCommand::Select(Some(ids[0].clone())));
        editor.apply(BuilderCommand::Select(Some(FieldId::new("nope"))));
        assert!(editor.selected_field().is_none());
    }

    #[test]
    fn test_drag_through_commands() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);

        editor.apply(BuilderCommand::StartCanvasDrag(ids[0].clone()));
        assert_eq!(
            editor.apply(BuilderCommand::DragOver(Some(1))),
            Applied::Effect(DropEffect::Move)
        );
        let applied = editor.apply(BuilderCommand::Drop(Some(1)));
        assert!(matches!(applied, Applied::Dropped(DropOutcome::Moved { .. })));
        assert_eq!(editor.draft().fields[1].id, ids[0]);

        assert_eq!(
            editor.apply(BuilderCommand::Drop(Some(0))),
            Applied::Dropped(DropOutcome::Ignored(IgnoredDrop::NoActiveDrag))
        );
    }

    #[test]
    fn test_option_and_settings_commands() {
        let (mut editor, ids) = editor_with(&[FieldType::Radio]);
        editor.apply(BuilderCommand::AddOption(ids[0].clone()));
        editor.apply(BuilderCommand::UpdateOption {
            id: ids[0].clone(),
            index: 0,
            value: "Small".into(),
        });
        editor.apply(BuilderCommand::RemoveOption {
            id: ids[0].clone(),
            index: 1,
        });
        editor.apply(BuilderCommand::UpdateSettings(
            SettingsUpdate::new().title("Sizes"),
        ));

        let draft = editor.draft();
        assert_eq!(draft.fields[0].options, vec!["Small", "Option 3"]);
        assert_eq!(draft.settings.title, "Sizes");
    }

    #[test]
    fn test_render_switches_with_preview() {
        let (mut editor, _) = editor_with(&[]);
        assert!(editor.render().contains(render::EMPTY_CANVAS_HINT));

        editor.apply(BuilderCommand::TogglePreview);
        assert!(editor.is_preview());
        assert!(editor.render().contains("<form"));
    }

    #[test]
    fn test_begin_rejects_duplicate_action() {
        let mut editor = FormEditor::new();
        editor.begin(EditorAction::Save).unwrap();
        assert!(matches!(
            editor.begin(EditorAction::Save),
            Err(EditorError::Busy(EditorAction::Save))
        ));
        editor.begin(EditorAction::Publish).unwrap();
        editor.finish(EditorAction::Save);
        assert!(!editor.is_pending(EditorAction::Save));
        assert!(editor.is_pending(EditorAction::Publish));
    }

    #[test]
    fn test_public_url_after_save() {
        let mut editor = FormEditor::new();
        assert_eq!(editor.public_url("http://localhost:3000"), None);

        editor.draft.id = Some(FormId::new("abc"));
        assert_eq!(
            editor.public_url("http://localhost:3000/").as_deref(),
            Some("http://localhost:3000/form/abc")
        );
    }
}
