//! Orchestrator module for the Solr row sink.
//!
//! Drives one stream instance: pulls rows, resolves the field mapping on the
//! first row, indexes each row's document, forwards the row downstream and
//! commits in batches. Any fatal failure drains the stream: a final commit
//! is attempted and the output is marked done.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::consumer::RowSource;
use crate::errors::IngestError;
use crate::loader::{CommitOutcome, IndexLoader, LoaderConfig, DEFAULT_COMMIT_THRESHOLD};
use crate::output::RowSink;
use crate::processor::{DocumentBuilder, FieldMapping, ResolvedMapping, DEFAULT_KEY_FIELD};
use solr_sink_repository::IndexClient;
use solr_sink_shared::Row;

/// Default number of rows between progress log lines.
pub const DEFAULT_FEEDBACK_SIZE: u64 = 50_000;

/// Configuration for the row processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Number of successful adds between commits.
    pub commit_threshold: usize,
    /// Document field that receives raw values instead of `set` updates.
    pub key_field: String,
    /// Rows between progress log lines; zero disables progress logging.
    pub feedback_size: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
            key_field: DEFAULT_KEY_FIELD.to_string(),
            feedback_size: DEFAULT_FEEDBACK_SIZE,
        }
    }
}

/// Lifecycle of a stream instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorState {
    /// No row seen yet; the field mapping is unresolved.
    Uninitialized,
    /// Mapping resolved, rows are flowing.
    Running(ResolvedMapping),
    /// Input finished, stopped or failed; final commit and output completion pending.
    Draining,
    /// Terminal. The index connection is released.
    Stopped,
}

/// Result of processing a single row.
#[derive(Debug)]
pub enum RowOutcome {
    /// Document added and row forwarded downstream.
    Forwarded,
    /// Fatal failure; the stream must drain.
    Failed(IngestError),
}

/// Counters reported when a stream instance stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Identifies this instance in logs when several copies run side by side.
    pub stream_id: Uuid,
    pub rows_read: u64,
    pub rows_written: u64,
    pub documents_added: u64,
    pub commits: u64,
    pub commit_failures: u64,
    /// Fatal errors; zero or one.
    pub errors: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StreamSummary {
    fn new() -> Self {
        Self {
            stream_id: Uuid::new_v4(),
            rows_read: 0,
            rows_written: 0,
            documents_added: 0,
            commits: 0,
            commit_failures: 0,
            errors: 0,
            started_at: None,
            finished_at: None,
        }
    }
}

/// Handle used to request a cooperative stop from another task.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    /// Ask the processor to stop pulling rows and drain.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Row processor owning one stream instance.
///
/// Each instance owns its own index connection and commit counter; nothing
/// is shared between instances.
pub struct RowProcessor {
    source: Box<dyn RowSource>,
    sink: Box<dyn RowSink>,
    mapping: FieldMapping,
    builder: DocumentBuilder,
    loader: IndexLoader,
    config: ProcessorConfig,
    state: ProcessorState,
    summary: StreamSummary,
    failure: Option<IngestError>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl RowProcessor {
    /// Create a new row processor with default configuration.
    pub fn new(
        source: Box<dyn RowSource>,
        sink: Box<dyn RowSink>,
        client: Arc<dyn IndexClient>,
        mapping: FieldMapping,
    ) -> Self {
        Self::with_config(source, sink, client, mapping, ProcessorConfig::default())
    }

    /// Create a new row processor with custom configuration.
    pub fn with_config(
        source: Box<dyn RowSource>,
        sink: Box<dyn RowSink>,
        client: Arc<dyn IndexClient>,
        mapping: FieldMapping,
        config: ProcessorConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let loader = IndexLoader::with_config(
            client,
            LoaderConfig {
                commit_threshold: config.commit_threshold,
            },
        );

        Self {
            source,
            sink,
            mapping,
            builder: DocumentBuilder::new(config.key_field.clone()),
            loader,
            config,
            state: ProcessorState::Uninitialized,
            summary: StreamSummary::new(),
            failure: None,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Run the stream to completion.
    ///
    /// Returns `Ok(())` when the input was exhausted or a stop was requested,
    /// and the fatal error otherwise. In both cases the final commit has been
    /// attempted, the output marked done and the index connection released.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), IngestError> {
        info!(
            stream_id = %self.summary.stream_id,
            url = %self.loader.endpoint(),
            fields = self.mapping.len(),
            "Starting to run"
        );
        self.summary.started_at = Some(Utc::now());

        while self.state != ProcessorState::Stopped {
            let state = std::mem::replace(&mut self.state, ProcessorState::Stopped);
            self.state = self.advance(state).await;
        }

        self.stop();

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Perform one state transition.
    async fn advance(&mut self, state: ProcessorState) -> ProcessorState {
        match state {
            ProcessorState::Uninitialized => self.pull(None).await,
            ProcessorState::Running(mapping) => self.pull(Some(mapping)).await,
            ProcessorState::Draining => {
                self.drain().await;
                ProcessorState::Stopped
            }
            ProcessorState::Stopped => ProcessorState::Stopped,
        }
    }

    /// Pull and process the next row.
    async fn pull(&mut self, mapping: Option<ResolvedMapping>) -> ProcessorState {
        let next = tokio::select! {
            biased;
            _ = self.shutdown_rx.recv() => {
                info!("Stop requested");
                return ProcessorState::Draining;
            }
            next = self.source.next_row() => next,
        };

        let row = match next {
            Ok(Some(row)) => row,
            Ok(None) => {
                info!("No more input");
                return ProcessorState::Draining;
            }
            Err(err) => {
                self.fail(err);
                return ProcessorState::Draining;
            }
        };
        self.summary.rows_read += 1;

        let mapping = match mapping {
            Some(mapping) => mapping,
            None => match self.mapping.resolve(row.schema()) {
                Ok(mapping) => {
                    info!(positions = ?mapping.positions(), "Resolved field mapping");
                    mapping
                }
                Err(err) => {
                    self.fail(err);
                    return ProcessorState::Draining;
                }
            },
        };

        match self.process_row(&mapping, row).await {
            RowOutcome::Forwarded => {
                self.report_progress();
                ProcessorState::Running(mapping)
            }
            RowOutcome::Failed(err) => {
                self.fail(err);
                ProcessorState::Draining
            }
        }
    }

    /// Index one row and forward it downstream.
    pub async fn process_row(&mut self, mapping: &ResolvedMapping, row: Row) -> RowOutcome {
        let document = self.builder.build(&row, mapping);

        match self.loader.add(&document).await {
            Ok(commit) => {
                self.summary.documents_added += 1;
                if let Some(outcome) = commit {
                    self.record_commit(&outcome);
                }
            }
            Err(err) => return RowOutcome::Failed(err),
        }

        match self.sink.put_row(row).await {
            Ok(()) => {
                self.summary.rows_written += 1;
                RowOutcome::Forwarded
            }
            Err(err) => RowOutcome::Failed(err),
        }
    }

    /// Final commit attempt and output completion.
    async fn drain(&mut self) {
        let outcome = self.loader.commit().await;
        self.record_commit(&outcome);

        if let Err(err) = self.sink.set_output_done().await {
            if self.failure.is_none() {
                self.fail(err);
            } else {
                error!(error = %err, "Failed to mark output done");
            }
        }
    }

    fn stop(&mut self) {
        if !self.loader.is_released() {
            self.loader.release();
        }
        self.summary.finished_at = Some(Utc::now());

        let summary = &self.summary;
        info!(
            stream_id = %summary.stream_id,
            rows_read = summary.rows_read,
            rows_written = summary.rows_written,
            documents_added = summary.documents_added,
            commits = summary.commits,
            commit_failures = summary.commit_failures,
            errors = summary.errors,
            "Finished processing"
        );
    }

    fn fail(&mut self, err: IngestError) {
        error!(error = %err, "Error in step running");
        self.summary.errors = 1;
        self.failure = Some(err);
    }

    fn record_commit(&mut self, outcome: &CommitOutcome) {
        match outcome {
            CommitOutcome::Skipped => {}
            CommitOutcome::Committed { .. } => self.summary.commits += 1,
            CommitOutcome::Failed { .. } => self.summary.commit_failures += 1,
        }
    }

    fn report_progress(&self) {
        let feedback = self.config.feedback_size;
        if feedback > 0 && self.summary.rows_read % feedback == 0 {
            info!(rows_read = self.summary.rows_read, "Processing progress");
        }
    }

    /// Handle for requesting a stop while `run` is in progress.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Request a stop before the next row is pulled.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn state(&self) -> &ProcessorState {
        &self.state
    }

    pub fn summary(&self) -> &StreamSummary {
        &self.summary
    }

    /// Documents added since the last successful commit.
    pub fn pending_commits(&self) -> usize {
        self.loader.pending()
    }
}
