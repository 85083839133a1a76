//! Field mapping configuration and resolution.
//!
//! The mapping is configured as ordered (source field, target field) pairs
//! and resolved once against the schema of the first row into column
//! positions.

use solr_sink_shared::RowSchema;
use tracing::error;

use crate::errors::IngestError;

/// One configured (source row field, target document field) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub source: String,
    pub target: String,
}

impl FieldPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered field mapping as configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMapping {
    pairs: Vec<FieldPair>,
}

impl FieldMapping {
    pub fn new(pairs: Vec<FieldPair>) -> Self {
        Self { pairs }
    }

    /// Build a mapping from two positionally paired lists.
    ///
    /// # Returns
    ///
    /// * `Ok(FieldMapping)` - If both lists have the same length
    /// * `Err(IngestError)` - If the lengths differ
    pub fn from_lists(sources: Vec<String>, targets: Vec<String>) -> Result<Self, IngestError> {
        if sources.len() != targets.len() {
            return Err(IngestError::config(format!(
                "{} source fields but {} target fields",
                sources.len(),
                targets.len()
            )));
        }

        Ok(Self {
            pairs: sources
                .into_iter()
                .zip(targets)
                .map(|(source, target)| FieldPair { source, target })
                .collect(),
        })
    }

    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Resolve every source field to its column position in `schema`.
    ///
    /// Fails on the first source field that is not in the schema; no partial
    /// mapping is ever returned.
    pub fn resolve(&self, schema: &RowSchema) -> Result<ResolvedMapping, IngestError> {
        let mut positions = Vec::with_capacity(self.pairs.len());
        let mut targets = Vec::with_capacity(self.pairs.len());

        for pair in &self.pairs {
            let Some(position) = schema.index_of(&pair.source) else {
                error!(field = %pair.source, "Error finding field in input row");
                return Err(IngestError::field_not_found(&pair.source));
            };
            positions.push(position);
            targets.push(pair.target.clone());
        }

        Ok(ResolvedMapping { positions, targets })
    }
}

/// Field mapping resolved against a concrete schema.
///
/// `positions[i]` is the column of the i-th configured source field and
/// `targets[i]` the document field it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    positions: Vec<usize>,
    targets: Vec<String>,
}

impl ResolvedMapping {
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Iterate over (column position, target field) pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.positions
            .iter()
            .copied()
            .zip(self.targets.iter().map(String::as_str))
    }
}
