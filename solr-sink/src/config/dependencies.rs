//! Dependency initialization and wiring for the Solr row sink.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::consumer::NdjsonRowSource;
use crate::orchestrator::{ProcessorConfig, RowProcessor, DEFAULT_FEEDBACK_SIZE};
use crate::output::NdjsonRowSink;
use crate::processor::FieldMapping;
use crate::IndexingError;
use solr_sink_repository::config::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS};
use solr_sink_repository::{SolrClient, SolrClientConfig};

/// Default Solr core URL.
const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/collection1";

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSettings {
    pub solr_url: String,
    pub source_fields: Vec<String>,
    pub target_fields: Vec<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub feedback_size: u64,
}

impl SinkSettings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_URL`: Solr core or collection URL (default: http://localhost:8983/solr/collection1)
    /// - `SOURCE_FIELDS`: Comma-separated row fields to index (required)
    /// - `TARGET_FIELDS`: Comma-separated document fields, paired by position (required)
    /// - `SOLR_CONNECT_TIMEOUT_MS`: Connect timeout in milliseconds (default: 10000)
    /// - `SOLR_READ_TIMEOUT_MS`: Read timeout in milliseconds (default: 60000)
    /// - `FEEDBACK_SIZE`: Rows between progress log lines (default: 50000)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let solr_url = lookup("SOLR_URL").unwrap_or_else(|| DEFAULT_SOLR_URL.to_string());

        let source_fields = lookup("SOURCE_FIELDS")
            .map(|value| split_fields(&value))
            .ok_or_else(|| IndexingError::config("SOURCE_FIELDS is required"))?;
        let target_fields = lookup("TARGET_FIELDS")
            .map(|value| split_fields(&value))
            .ok_or_else(|| IndexingError::config("TARGET_FIELDS is required"))?;

        if source_fields.len() != target_fields.len() {
            return Err(IndexingError::config(format!(
                "SOURCE_FIELDS has {} entries but TARGET_FIELDS has {}",
                source_fields.len(),
                target_fields.len()
            )));
        }

        let connect_timeout = Duration::from_millis(parse_or_default(
            &lookup,
            "SOLR_CONNECT_TIMEOUT_MS",
            DEFAULT_CONNECT_TIMEOUT_MS,
        ));
        let read_timeout = Duration::from_millis(parse_or_default(
            &lookup,
            "SOLR_READ_TIMEOUT_MS",
            DEFAULT_READ_TIMEOUT_MS,
        ));
        let feedback_size = parse_or_default(&lookup, "FEEDBACK_SIZE", DEFAULT_FEEDBACK_SIZE);

        Ok(Self {
            solr_url,
            source_fields,
            target_fields,
            connect_timeout,
            read_timeout,
            feedback_size,
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_fields(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or_default<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
            warn!(key = key, value = %value, default = default, "Invalid value, using default");
            default
        }),
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured row processor ready to run.
    pub processor: RowProcessor,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Rows are read as newline-delimited JSON from stdin and forwarded to
    /// stdout.
    pub fn new() -> Result<Self, IndexingError> {
        let settings = SinkSettings::from_env()?;
        Self::from_settings(settings)
    }

    /// Initialize dependencies from explicit settings.
    pub fn from_settings(settings: SinkSettings) -> Result<Self, IndexingError> {
        info!(
            solr_url = %settings.solr_url,
            source_fields = ?settings.source_fields,
            target_fields = ?settings.target_fields,
            connect_timeout_ms = settings.connect_timeout.as_millis() as u64,
            read_timeout_ms = settings.read_timeout.as_millis() as u64,
            "Initializing dependencies"
        );

        let client = SolrClient::new(
            SolrClientConfig::new(settings.solr_url)
                .with_timeouts(settings.connect_timeout, settings.read_timeout),
        )
        .map_err(|e| IndexingError::config(format!("Failed to create Solr client: {}", e)))?;

        let mapping = FieldMapping::from_lists(settings.source_fields, settings.target_fields)?;

        let config = ProcessorConfig {
            feedback_size: settings.feedback_size,
            ..ProcessorConfig::default()
        };

        let processor = RowProcessor::with_config(
            Box::new(NdjsonRowSource::stdin()),
            Box::new(NdjsonRowSink::stdout()),
            Arc::new(client),
            mapping,
            config,
        );

        Ok(Self { processor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = SinkSettings::from_lookup(lookup(&[
            ("SOURCE_FIELDS", "sku, title"),
            ("TARGET_FIELDS", "id,title_t"),
        ]))
        .unwrap();

        assert_eq!(settings.solr_url, DEFAULT_SOLR_URL);
        assert_eq!(settings.source_fields, vec!["sku", "title"]);
        assert_eq!(settings.target_fields, vec!["id", "title_t"]);
        assert_eq!(settings.connect_timeout, Duration::from_millis(10_000));
        assert_eq!(settings.read_timeout, Duration::from_millis(60_000));
        assert_eq!(settings.feedback_size, DEFAULT_FEEDBACK_SIZE);
    }

    #[test]
    fn test_overrides() {
        let settings = SinkSettings::from_lookup(lookup(&[
            ("SOLR_URL", "http://solr:8983/solr/books"),
            ("SOURCE_FIELDS", "sku"),
            ("TARGET_FIELDS", "id"),
            ("SOLR_CONNECT_TIMEOUT_MS", "500"),
            ("SOLR_READ_TIMEOUT_MS", "2000"),
            ("FEEDBACK_SIZE", "10"),
        ]))
        .unwrap();

        assert_eq!(settings.solr_url, "http://solr:8983/solr/books");
        assert_eq!(settings.connect_timeout, Duration::from_millis(500));
        assert_eq!(settings.read_timeout, Duration::from_millis(2000));
        assert_eq!(settings.feedback_size, 10);
    }

    #[test]
    fn test_invalid_number_falls_back_to_default() {
        let settings = SinkSettings::from_lookup(lookup(&[
            ("SOURCE_FIELDS", "sku"),
            ("TARGET_FIELDS", "id"),
            ("SOLR_READ_TIMEOUT_MS", "soon"),
        ]))
        .unwrap();

        assert_eq!(settings.read_timeout, Duration::from_millis(60_000));
    }

    #[test]
    fn test_missing_fields_is_config_error() {
        let result = SinkSettings::from_lookup(lookup(&[("TARGET_FIELDS", "id")]));

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_length_mismatch_is_config_error() {
        let result = SinkSettings::from_lookup(lookup(&[
            ("SOURCE_FIELDS", "sku,title"),
            ("TARGET_FIELDS", "id"),
        ]));

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
