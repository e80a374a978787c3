//! Drag-and-drop state machine for the builder canvas.
//!
//! A gesture starts on a palette item or on a field already on the canvas,
//! passes over any number of drop targets, and ends in a drop or a cancel:
//!
//! ```text
//! Idle --start--> Dragging --drag_over--> Dragging
//!                    |--drop--> (apply effect) --> Idle
//!                    `--cancel--> Idle
//! ```
//!
//! Drop effects:
//!
//! | Origin | Target | Effect |
//! |--------|--------|--------|
//! | palette | index or none | insert a new field at the index, or append |
//! | canvas | none, current index, or field gone | nothing |
//! | canvas | another index | move the field there |
//!
//! The held item is cleared after every drop, including the ones that do
//! nothing, so a stale gesture never leaks into the next one.

use tracing::debug;

use crate::catalog::FieldType;
use crate::draft::FormDraft;
use crate::field::Field;
use crate::ids::FieldId;

/// Where a dragged item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    /// The field type palette.
    Palette,
    /// The canvas of fields already in the form.
    Canvas,
}

/// The item held during a drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DraggedItem {
    /// A field type taken from the palette.
    Palette(FieldType),
    /// A field picked up from the canvas.
    Canvas(Field),
}

impl DraggedItem {
    /// Returns where the item came from.
    pub fn origin(&self) -> DragOrigin {
        match self {
            Self::Palette(_) => DragOrigin::Palette,
            Self::Canvas(_) => DragOrigin::Canvas,
        }
    }
}

/// Cursor affordance shown while hovering a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// No drag in progress.
    None,
    /// A new field would be created.
    Copy,
    /// An existing field would move.
    Move,
}

/// Why a drop left the draft unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredDrop {
    /// Nothing was being dragged.
    NoActiveDrag,
    /// A canvas field was dropped without a target index.
    NoTarget,
    /// A canvas field was dropped onto its own position.
    SamePosition,
    /// The dragged field is no longer part of the draft.
    FieldMissing,
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A new field was inserted.
    Added {
        /// Id of the new field.
        id: FieldId,
        /// Position it landed at.
        index: usize,
    },
    /// An existing field was moved.
    Moved {
        /// Id of the moved field.
        id: FieldId,
        /// Previous position.
        from: usize,
        /// New position.
        to: usize,
    },
    /// The draft was not touched.
    Ignored(IgnoredDrop),
}

impl DropOutcome {
    /// Returns whether the draft changed.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Drag state: idle, or holding one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragEngine {
    held: Option<DraggedItem>,
}

impl DragEngine {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    /// Returns the held item.
    pub fn held(&self) -> Option<&DraggedItem> {
        self.held.as_ref()
    }

    /// Starts a gesture, replacing any gesture that was never finished.
    pub fn start(&mut self, item: DraggedItem) {
        debug!(origin = ?item.origin(), "drag started");
        self.held = Some(item);
    }

    /// Starts dragging a palette entry.
    pub fn start_palette(&mut self, field_type: FieldType) {
        self.start(DraggedItem::Palette(field_type));
    }

    /// Starts dragging a field from the canvas.
    pub fn start_canvas(&mut self, field: Field) {
        self.start(DraggedItem::Canvas(field));
    }

    /// Reports the affordance for hovering a target. Does not change state.
    pub fn drag_over(&self, _target: Option<usize>) -> DropEffect {
        match self.held.as_ref().map(DraggedItem::origin) {
            None => DropEffect::None,
            Some(DragOrigin::Palette) => DropEffect::Copy,
            Some(DragOrigin::Canvas) => DropEffect::Move,
        }
    }

    /// Abandons the gesture.
    pub fn cancel(&mut self) {
        if self.held.take().is_some() {
            debug!("drag cancelled");
        }
    }

    /// Ends the gesture on `target` (a field position, or `None` for the
    /// canvas background) and applies its effect to `draft`.
    pub fn drop(&mut self, draft: &mut FormDraft, target: Option<usize>) -> DropOutcome {
        let outcome = match self.held.take() {
            None => DropOutcome::Ignored(IgnoredDrop::NoActiveDrag),
            Some(DraggedItem::Palette(field_type)) => {
                let id = draft.add_field(field_type, target);
                let index = draft.index_of(&id).unwrap_or(draft.fields.len() - 1);
                DropOutcome::Added { id, index }
            }
            Some(DraggedItem::Canvas(field)) => Self::drop_existing(draft, field.id, target),
        };
        debug!(?outcome, "drop resolved");
        outcome
    }

    fn drop_existing(draft: &mut FormDraft, id: FieldId, target: Option<usize>) -> DropOutcome {
        let Some(from) = draft.index_of(&id) else {
            return DropOutcome::Ignored(IgnoredDrop::FieldMissing);
        };
        let Some(to) = target else {
            return DropOutcome::Ignored(IgnoredDrop::NoTarget);
        };
        if !draft.reorder_field(&id, to) {
            return DropOutcome::Ignored(IgnoredDrop::SamePosition);
        }
        let to = draft.index_of(&id).unwrap_or(to);
        DropOutcome::Moved { id, from, to }
    }
}
