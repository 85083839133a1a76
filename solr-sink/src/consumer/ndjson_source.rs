//! Newline-delimited JSON row source.
//!
//! Each non-blank line is one JSON object. The key order of the first object
//! fixes the schema for the whole stream; later objects are read through that
//! schema, so missing keys read as null and extra keys are ignored.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use solr_sink_shared::{Row, RowSchema};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::debug;

use super::RowSource;
use crate::errors::IngestError;

/// Row source reading one JSON object per line.
pub struct NdjsonRowSource<R> {
    lines: LinesStream<R>,
    schema: Option<Arc<RowSchema>>,
    line_number: u64,
}

impl<R: AsyncBufRead + Unpin + Send> NdjsonRowSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LinesStream::new(reader.lines()),
            schema: None,
            line_number: 0,
        }
    }

    /// Schema of the stream, known once the first row has been read.
    pub fn schema(&self) -> Option<&Arc<RowSchema>> {
        self.schema.as_ref()
    }

    fn parse_line(&mut self, line: &str) -> Result<Row, IngestError> {
        let object: Map<String, Value> = match serde_json::from_str(line) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                return Err(IngestError::parse(format!(
                    "line {}: expected a JSON object, got {}",
                    self.line_number, other
                )))
            }
            Err(e) => {
                return Err(IngestError::parse(format!(
                    "line {}: {}",
                    self.line_number, e
                )))
            }
        };

        let schema = self
            .schema
            .get_or_insert_with(|| {
                let schema = RowSchema::new(object.keys().cloned());
                debug!(fields = ?schema.fields(), "Row schema established");
                Arc::new(schema)
            })
            .clone();

        let values = schema
            .fields()
            .iter()
            .map(|field| object.get(field).cloned().unwrap_or(Value::Null))
            .collect();

        Ok(Row::new(schema, values))
    }
}

impl NdjsonRowSource<BufReader<Stdin>> {
    /// Source reading from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RowSource for NdjsonRowSource<R> {
    async fn next_row(&mut self) -> Result<Option<Row>, IngestError> {
        while let Some(line) = self.lines.next().await {
            let line = line.map_err(|e| IngestError::source_failed(e.to_string()))?;
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }
            return self.parse_line(&line).map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(input: &'static str) -> NdjsonRowSource<&'static [u8]> {
        NdjsonRowSource::new(input.as_bytes())
    }

    #[tokio::test]
    async fn test_schema_from_first_object() {
        let mut source = source(
            "{\"sku\":\"a-1\",\"title\":\"Lamp\",\"price\":19.9}\n{\"price\":5,\"sku\":\"a-2\"}\n",
        );

        let first = source.next_row().await.unwrap().unwrap();
        let second = source.next_row().await.unwrap().unwrap();

        assert_eq!(first.schema().fields(), &["sku", "title", "price"]);
        assert_eq!(first.values(), &[json!("a-1"), json!("Lamp"), json!(19.9)]);
        assert_eq!(second.values(), &[json!("a-2"), Value::Null, json!(5)]);
        assert!(Arc::ptr_eq(first.schema(), second.schema()));
        assert!(source.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let mut source = source("\n{\"id\":1}\n   \n{\"id\":2}");

        assert_eq!(source.next_row().await.unwrap().unwrap().values(), &[json!(1)]);
        assert_eq!(source.next_row().await.unwrap().unwrap().values(), &[json!(2)]);
        assert!(source.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_extra_keys_are_ignored() {
        let mut source = source("{\"id\":1}\n{\"id\":2,\"extra\":true}\n");

        source.next_row().await.unwrap();
        let row = source.next_row().await.unwrap().unwrap();

        assert_eq!(row.values(), &[json!(2)]);
    }

    #[tokio::test]
    async fn test_non_object_line_is_parse_error() {
        let mut source = source("{\"id\":1}\n[1,2]\n");

        source.next_row().await.unwrap();
        let result = source.next_row().await;

        match result {
            Err(IngestError::ParseError(msg)) => assert!(msg.starts_with("line 2")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut source = source("{\"id\":\n");

        assert!(matches!(
            source.next_row().await,
            Err(IngestError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut source = source("");

        assert!(source.next_row().await.unwrap().is_none());
        assert!(source.schema().is_none());
    }
}
