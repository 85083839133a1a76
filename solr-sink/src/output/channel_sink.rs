//! Channel-backed row sink.

use async_trait::async_trait;
use solr_sink_shared::Row;
use tokio::sync::mpsc;

use super::RowSink;
use crate::errors::IngestError;

/// Forwards rows into an `mpsc` channel. Output completion drops the sender,
/// which closes the channel for the receiver.
pub struct ChannelRowSink {
    sender: Option<mpsc::Sender<Row>>,
}

impl ChannelRowSink {
    pub fn new(sender: mpsc::Sender<Row>) -> Self {
        Self {
            sender: Some(sender),
        }
    }
}

#[async_trait]
impl RowSink for ChannelRowSink {
    async fn put_row(&mut self, row: Row) -> Result<(), IngestError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| IngestError::sink_failed("output already marked done"))?;

        sender
            .send(row)
            .await
            .map_err(|_| IngestError::sink_failed("downstream receiver dropped"))
    }

    async fn set_output_done(&mut self) -> Result<(), IngestError> {
        self.sender.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solr_sink_shared::RowSchema;
    use std::sync::Arc;

    fn row() -> Row {
        Row::new(Arc::new(RowSchema::new(["id"])), vec![json!(1)])
    }

    #[tokio::test]
    async fn test_output_done_closes_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChannelRowSink::new(tx);

        sink.put_row(row()).await.unwrap();
        sink.set_output_done().await.unwrap();

        assert_eq!(rx.recv().await, Some(row()));
        assert_eq!(rx.recv().await, None);
        assert!(sink.put_row(row()).await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_sink_error() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let mut sink = ChannelRowSink::new(tx);

        assert!(matches!(
            sink.put_row(row()).await,
            Err(IngestError::SinkError(_))
        ));
    }
}
