//! Configuration types for the SolrClient.

use std::time::Duration;

/// Default connection establishment timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default socket read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 60_000;

/// Configuration for the SolrClient.
///
/// The connect timeout bounds establishing the TCP connection; the read
/// timeout bounds each read of the exchange and is normally much longer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolrClientConfig {
    /// Base URL of the Solr core or collection, e.g.
    /// `http://localhost:8983/solr/collection1`.
    pub url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl SolrClientConfig {
    /// Create a config with the default timeouts.
    ///
    /// # Arguments
    ///
    /// * `url` - Base URL of the Solr core or collection
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }

    /// Override both timeouts.
    pub fn with_timeouts(mut self, connect_timeout: Duration, read_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self
    }
}
