//! Newline-delimited JSON row sink.

use async_trait::async_trait;
use solr_sink_shared::Row;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};

use super::RowSink;
use crate::errors::IngestError;

/// Writes each row as one JSON object per line, keys in schema order.
pub struct NdjsonRowSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> NdjsonRowSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl NdjsonRowSink<BufWriter<Stdout>> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(tokio::io::stdout()))
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RowSink for NdjsonRowSink<W> {
    async fn put_row(&mut self, row: Row) -> Result<(), IngestError> {
        let mut line = serde_json::to_vec(&row).map_err(|e| IngestError::sink_failed(e.to_string()))?;
        line.push(b'\n');

        self.writer
            .write_all(&line)
            .await
            .map_err(|e| IngestError::sink_failed(e.to_string()))
    }

    async fn set_output_done(&mut self) -> Result<(), IngestError> {
        self.writer
            .flush()
            .await
            .map_err(|e| IngestError::sink_failed(e.to_string()))
    }
}
