//! Row types flowing through the host pipeline.
//!
//! A stream carries rows that all share one schema. Rows are immutable once
//! produced: the sink forwards them downstream exactly as it received them.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Ordered list of field names shared by every row of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSchema {
    fields: Vec<String>,
}

impl RowSchema {
    /// Create a schema from an ordered list of field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of the field with the given name, if present.
    ///
    /// Names are compared exactly. When a name appears more than once the
    /// first position is returned.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }

    /// The field names in schema order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One row of a stream: values positionally aligned with the schema.
///
/// `Value::Null` stands for an absent value. Rows shorter than their schema
/// read as null in the missing trailing positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<RowSchema>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row bound to a shared schema.
    pub fn new(schema: Arc<RowSchema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a column position, `None` when the position holds null or is
    /// out of range.
    pub fn value_at(&self, position: usize) -> Option<&Value> {
        match self.values.get(position) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Value of a named field, `None` when absent or null.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .index_of(name)
            .and_then(|position| self.value_at(position))
    }
}

/// Serializes as a JSON object with keys in schema order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.len()))?;
        for (position, field) in self.schema.fields().iter().enumerate() {
            map.serialize_entry(field, self.values.get(position).unwrap_or(&Value::Null))?;
        }
        map.end()
    }
}
