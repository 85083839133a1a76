//! Loader module for the Solr row sink.
//!
//! Sends documents to the index one at a time and commits them in batches.

mod commit_policy;

pub use commit_policy::{CommitPolicy, DEFAULT_COMMIT_THRESHOLD};

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::errors::IngestError;
use solr_sink_repository::IndexClient;
use solr_sink_shared::IndexDocument;

/// Configuration for the index loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of successful adds between commits.
    pub commit_threshold: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
        }
    }
}

/// Result of a commit attempt.
///
/// Commit failures are not errors: losing visibility of an already added
/// batch is preferred over aborting a stream that otherwise succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing was pending, no request sent.
    Skipped,
    /// The pending documents were committed.
    Committed { documents: usize },
    /// The commit request failed; the documents stay pending.
    Failed { pending: usize, reason: String },
}

/// Loader that adds documents to the index and commits them in batches.
///
/// The loader is responsible for:
/// - Sending each document and checking the add response
/// - Counting successful adds and committing at the threshold
/// - Holding the index connection until it is released
pub struct IndexLoader {
    client: Option<Arc<dyn IndexClient>>,
    endpoint: String,
    policy: CommitPolicy,
}

impl IndexLoader {
    /// Create a new index loader with the given client.
    pub fn new(client: Arc<dyn IndexClient>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create a new index loader with custom configuration.
    pub fn with_config(client: Arc<dyn IndexClient>, config: LoaderConfig) -> Self {
        Self {
            endpoint: client.endpoint().to_string(),
            client: Some(client),
            policy: CommitPolicy::new(config.commit_threshold),
        }
    }

    /// Add one document.
    ///
    /// A transport error, a null response or a non-zero response status is
    /// an add failure. On success the add is counted and, when the threshold
    /// is reached, a commit is attempted and its outcome returned.
    #[instrument(skip(self, document))]
    pub async fn add(
        &mut self,
        document: &IndexDocument,
    ) -> Result<Option<CommitOutcome>, IngestError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| IngestError::add_failed(&self.endpoint, "index connection released"))?;

        let response = client
            .add(document)
            .await
            .map_err(|e| IngestError::add_failed(&self.endpoint, e.to_string()))?;

        let Some(response) = response else {
            return Err(IngestError::add_failed(&self.endpoint, "null response"));
        };
        if !response.is_success() {
            return Err(IngestError::add_failed(&self.endpoint, response.raw));
        }

        if self.policy.record_add() {
            return Ok(Some(self.commit().await));
        }
        Ok(None)
    }

    /// Commit pending documents, if any.
    #[instrument(skip(self))]
    pub async fn commit(&mut self) -> CommitOutcome {
        let pending = self.policy.pending();
        if pending == 0 {
            return CommitOutcome::Skipped;
        }

        let Some(client) = self.client.as_ref() else {
            warn!(pending = pending, "Index connection released, cannot commit");
            return CommitOutcome::Failed {
                pending,
                reason: "index connection released".to_string(),
            };
        };

        info!(pending = pending, "Committing documents");
        let reason = match client.commit().await {
            Ok(Some(response)) if response.is_success() => {
                debug!(response = %response.raw, "Commit response");
                self.policy.committed();
                return CommitOutcome::Committed { documents: pending };
            }
            Ok(Some(response)) => response.raw,
            Ok(None) => "null response".to_string(),
            Err(e) => e.to_string(),
        };

        warn!(
            url = %self.endpoint,
            pending = pending,
            error = %reason,
            "Failed to commit documents"
        );
        CommitOutcome::Failed { pending, reason }
    }

    /// Drop the index connection.
    pub fn release(&mut self) {
        if self.client.take().is_some() {
            debug!(url = %self.endpoint, "Released index connection");
        } else {
            warn!(url = %self.endpoint, "Index connection already released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.client.is_none()
    }

    /// Documents added since the last successful commit.
    pub fn pending(&self) -> usize {
        self.policy.pending()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use solr_sink_repository::{SolrError, UpdateResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const URL: &str = "http://localhost:8983/solr/books";

    fn ok_response() -> Option<UpdateResponse> {
        UpdateResponse::parse(r#"{"responseHeader":{"status":0,"QTime":1}}"#).unwrap()
    }

    /// Mock index client with scripted add and commit answers.
    struct MockIndexClient {
        add_responses: Mutex<Vec<Result<Option<UpdateResponse>, SolrError>>>,
        commit_fails: bool,
        added_count: AtomicUsize,
        commit_count: AtomicUsize,
    }

    impl MockIndexClient {
        fn new() -> Self {
            Self {
                add_responses: Mutex::new(Vec::new()),
                commit_fails: false,
                added_count: AtomicUsize::new(0),
                commit_count: AtomicUsize::new(0),
            }
        }

        fn with_add_response(response: Result<Option<UpdateResponse>, SolrError>) -> Self {
            let client = Self::new();
            client.add_responses.lock().unwrap().push(response);
            client
        }

        fn with_failing_commit() -> Self {
            Self {
                commit_fails: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl IndexClient for MockIndexClient {
        async fn add(
            &self,
            _document: &IndexDocument,
        ) -> Result<Option<UpdateResponse>, SolrError> {
            self.added_count.fetch_add(1, Ordering::SeqCst);
            self.add_responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ok_response()))
        }

        async fn commit(&self) -> Result<Option<UpdateResponse>, SolrError> {
            self.commit_count.fetch_add(1, Ordering::SeqCst);
            if self.commit_fails {
                Err(SolrError::connection("connection reset"))
            } else {
                Ok(ok_response())
            }
        }

        fn endpoint(&self) -> &str {
            URL
        }
    }

    fn document() -> IndexDocument {
        let mut doc = IndexDocument::new();
        doc.set_value("id", json!("book-1"));
        doc
    }

    #[tokio::test]
    async fn test_commit_at_threshold() {
        let client = Arc::new(MockIndexClient::new());
        let mut loader = IndexLoader::with_config(
            client.clone(),
            LoaderConfig {
                commit_threshold: 3,
            },
        );

        assert_eq!(loader.add(&document()).await.unwrap(), None);
        assert_eq!(loader.add(&document()).await.unwrap(), None);
        assert_eq!(
            loader.add(&document()).await.unwrap(),
            Some(CommitOutcome::Committed { documents: 3 })
        );

        assert_eq!(loader.pending(), 0);
        assert_eq!(client.added_count.load(Ordering::SeqCst), 3);
        assert_eq!(client.commit_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_skipped_when_nothing_pending() {
        let client = Arc::new(MockIndexClient::new());
        let mut loader = IndexLoader::new(client.clone());

        assert_eq!(loader.commit().await, CommitOutcome::Skipped);
        assert_eq!(client.commit_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_null_add_response_is_failure() {
        let client = Arc::new(MockIndexClient::with_add_response(Ok(None)));
        let mut loader = IndexLoader::new(client);

        let result = loader.add(&document()).await;

        match result {
            Err(IngestError::AddFailed { url, detail }) => {
                assert_eq!(url, URL);
                assert_eq!(detail, "null response");
            }
            other => panic!("Expected AddFailed, got {:?}", other),
        }
        assert_eq!(loader.pending(), 0);
    }

    #[tokio::test]
    async fn test_non_zero_status_is_failure_with_raw_response() {
        let body = r#"{"responseHeader":{"status":400,"QTime":0},"error":{"msg":"bad doc"}}"#;
        let client = Arc::new(MockIndexClient::with_add_response(UpdateResponse::parse(
            body,
        )));
        let mut loader = IndexLoader::new(client);

        let result = loader.add(&document()).await;

        match result {
            Err(IngestError::AddFailed { detail, .. }) => assert_eq!(detail, body),
            other => panic!("Expected AddFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        let client = Arc::new(MockIndexClient::with_add_response(Err(SolrError::timeout(
            "read timed out",
        ))));
        let mut loader = IndexLoader::new(client);

        let result = loader.add(&document()).await;

        match result {
            Err(err @ IngestError::AddFailed { .. }) => {
                let msg = err.to_string();
                assert!(msg.contains(URL));
                assert!(msg.contains("read timed out"));
            }
            other => panic!("Expected AddFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_documents_pending() {
        let client = Arc::new(MockIndexClient::with_failing_commit());
        let mut loader = IndexLoader::new(client);

        loader.add(&document()).await.unwrap();
        let outcome = loader.commit().await;

        assert!(matches!(outcome, CommitOutcome::Failed { pending: 1, .. }));
        assert_eq!(loader.pending(), 1);
    }

    #[tokio::test]
    async fn test_release_drops_connection() {
        let client = Arc::new(MockIndexClient::new());
        let mut loader = IndexLoader::new(client.clone());
        assert_eq!(Arc::strong_count(&client), 2);

        loader.release();

        assert!(loader.is_released());
        assert_eq!(Arc::strong_count(&client), 1);
        assert!(matches!(
            loader.add(&document()).await,
            Err(IngestError::AddFailed { .. })
        ));
    }
}
