//! Inventory record, write payload, and form-draft validation.

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Full write payload for one record.
///
/// Every store write carries all three fields; a record is never partially
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Display label; immutable after creation.
    pub name: String,
    /// Non-negative item count.
    pub quantity: u32,
    /// Expiration date as `YYYY-MM-DD` text.
    pub expiration: String,
}

/// A record as fetched from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Stable identifier within the record's collection scope.
    pub id: RecordId,
    /// Display label.
    pub name: String,
    /// Non-negative item count.
    pub quantity: u32,
    /// Expiration date as `YYYY-MM-DD` text.
    pub expiration: String,
}

impl InventoryRecord {
    /// Combines a store row into a record.
    pub fn from_parts(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            name: fields.name,
            quantity: fields.quantity,
            expiration: fields.expiration,
        }
    }

    /// Write payload carrying this record's current field values.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            quantity: self.quantity,
            expiration: self.expiration.clone(),
        }
    }
}

/// Raw form input before coercion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDraft {
    /// Name field text.
    pub name: String,
    /// Quantity field text, coerced on validation.
    pub quantity: String,
    /// Expiration field text.
    pub expiration: String,
}

/// Rejected form input; no remote write is issued for these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name field is empty.
    MissingName,
    /// Quantity field is empty.
    MissingQuantity,
    /// Expiration field is empty.
    MissingExpiration,
    /// Quantity is not a non-negative base-10 integer.
    InvalidQuantity(String),
}

impl RecordDraft {
    /// Coerces the draft into a write payload.
    ///
    /// All three fields must be non-empty and quantity must parse as a
    /// non-negative integer. Leading/trailing whitespace on the quantity is
    /// tolerated; the name and expiration are kept verbatim.
    pub fn validated(&self) -> Result<RecordFields, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.quantity.trim().is_empty() {
            return Err(ValidationError::MissingQuantity);
        }
        if self.expiration.is_empty() {
            return Err(ValidationError::MissingExpiration);
        }

        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidQuantity(self.quantity.clone()))?;

        Ok(RecordFields {
            name: self.name.clone(),
            quantity,
            expiration: self.expiration.clone(),
        })
    }
}
