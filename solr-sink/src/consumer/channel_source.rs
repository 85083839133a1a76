//! Channel-backed row source.

use async_trait::async_trait;
use solr_sink_shared::Row;
use tokio::sync::mpsc;

use super::RowSource;
use crate::errors::IngestError;

/// Reads rows from an `mpsc` channel; the input ends when every sender is
/// dropped.
pub struct ChannelRowSource {
    receiver: mpsc::Receiver<Row>,
}

impl ChannelRowSource {
    pub fn new(receiver: mpsc::Receiver<Row>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl RowSource for ChannelRowSource {
    async fn next_row(&mut self) -> Result<Option<Row>, IngestError> {
        Ok(self.receiver.recv().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solr_sink_shared::RowSchema;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reads_until_senders_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let mut source = ChannelRowSource::new(rx);
        let schema = Arc::new(RowSchema::new(["id"]));

        tx.send(Row::new(schema.clone(), vec![json!(1)])).await.unwrap();
        tx.send(Row::new(schema, vec![json!(2)])).await.unwrap();
        drop(tx);

        assert_eq!(source.next_row().await.unwrap().unwrap().values(), &[json!(1)]);
        assert_eq!(source.next_row().await.unwrap().unwrap().values(), &[json!(2)]);
        assert!(source.next_row().await.unwrap().is_none());
    }
}
