//! Add/edit form session: tracks whether the user is composing a new record or
//! editing an existing one, and which fields are editable.

use crate::record::{InventoryRecord, RecordDraft};

/// One of the three form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Item name; frozen while editing an existing record.
    Name,
    /// Quantity text.
    Quantity,
    /// Expiration text.
    Expiration,
}

/// Derived session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Add mode, form empty.
    Idle,
    /// Add mode, user has entered some field values.
    Composing,
    /// Editing a selected existing record.
    Editing,
}

/// Form field values plus the record under edit, if any.
///
/// The machine cycles for the lifetime of the screen; there is no terminal
/// state. Submitting while editing updates the selected record and submitting
/// otherwise adds a new one; that routing belongs to the caller, driven by
/// [`EditSession::mode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    name: String,
    quantity: String,
    expiration: String,
    editing: Option<InventoryRecord>,
}

impl EditSession {
    /// Empty add-mode session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, derived from form content and edit selection.
    pub fn mode(&self) -> SessionMode {
        if self.editing.is_some() {
            SessionMode::Editing
        } else if self.name.is_empty() && self.quantity.is_empty() && self.expiration.is_empty() {
            SessionMode::Idle
        } else {
            SessionMode::Composing
        }
    }

    /// Record currently under edit.
    pub fn editing(&self) -> Option<&InventoryRecord> {
        self.editing.as_ref()
    }

    /// Sets one form field.
    ///
    /// The name field is immutable while editing; writes to it are dropped.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        match field {
            FormField::Name => {
                if self.editing.is_none() {
                    self.name = value.into();
                }
            }
            FormField::Quantity => self.quantity = value.into(),
            FormField::Expiration => self.expiration = value.into(),
        }
    }

    /// Enters edit mode, pre-filling the form from `record`.
    pub fn begin_edit(&mut self, record: InventoryRecord) {
        self.name = record.name.clone();
        self.quantity = record.quantity.to_string();
        self.expiration = record.expiration.clone();
        self.editing = Some(record);
    }

    /// Leaves edit mode and clears the form.
    ///
    /// Only meaningful while editing; add mode has no cancel action and this is
    /// a no-op there.
    pub fn cancel(&mut self) {
        if self.editing.is_some() {
            self.reset();
        }
    }

    /// Clears all form state after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Snapshot of the form for submission.
    pub fn draft(&self) -> RecordDraft {
        RecordDraft {
            name: self.name.clone(),
            quantity: self.quantity.clone(),
            expiration: self.expiration.clone(),
        }
    }

    /// Name field text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity field text.
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    /// Expiration field text.
    pub fn expiration(&self) -> &str {
        &self.expiration
    }
}
