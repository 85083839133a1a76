//! Document builder implementation.
//!
//! Turns one row into one `IndexDocument` using a resolved field mapping.

use solr_sink_shared::{IndexDocument, PartialUpdate, Row};

use super::field_mapping::ResolvedMapping;

/// Name of the document's primary key field.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Builds partial-update documents from rows.
///
/// For each mapped field, in configured order:
/// - null values are skipped;
/// - the key field gets the raw value;
/// - every other field gets a `set` partial update.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    key_field: String,
}

impl DocumentBuilder {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
        }
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Build the document for `row`.
    pub fn build(&self, row: &Row, mapping: &ResolvedMapping) -> IndexDocument {
        let mut doc = IndexDocument::new();

        for (position, target) in mapping.iter() {
            let Some(value) = row.value_at(position) else {
                continue;
            };

            if target == self.key_field {
                doc.set_value(target, value.clone());
            } else {
                doc.set_update(target, PartialUpdate::set(value.clone()));
            }
        }

        doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FIELD)
    }
}
