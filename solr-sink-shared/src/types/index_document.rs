//! Index document types for the search index.
//!
//! A document is built fresh for every row. The key field carries its raw
//! value; every other field is wrapped in a partial-update operator so the
//! search index only replaces that field of an already indexed document.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Partial-update operations understood by the search index.
///
/// Only single-value replacement is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperation {
    /// Replace the field's value.
    Set,
}

impl UpdateOperation {
    /// The operator name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOperation::Set => "set",
        }
    }
}

/// A partial-update directive for one field, serialized as `{"set": value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub operation: UpdateOperation,
    pub value: Value,
}

impl PartialUpdate {
    /// Create a `set` directive.
    pub fn set(value: Value) -> Self {
        Self {
            operation: UpdateOperation::Set,
            value,
        }
    }
}

impl Serialize for PartialUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.operation.as_str(), &self.value)?;
        map.end()
    }
}

/// Value of one document field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DocumentField {
    /// Raw value, used for the document key.
    Value(Value),
    /// Partial update of a non-key field.
    Update(PartialUpdate),
}

/// Document representation sent to the search index.
///
/// Field names map to either a raw value or a partial update. Setting a field
/// that is already present replaces it.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct IndexDocument {
    fields: BTreeMap<String, DocumentField>,
}

impl IndexDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a raw value.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), DocumentField::Value(value));
    }

    /// Set a field to a partial-update directive.
    pub fn set_update(&mut self, name: impl Into<String>, update: PartialUpdate) {
        self.fields
            .insert(name.into(), DocumentField::Update(update));
    }

    pub fn get(&self, name: &str) -> Option<&DocumentField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &DocumentField)> {
        self.fields.iter()
    }
}
