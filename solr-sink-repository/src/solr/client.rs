//! Solr client implementation.
//!
//! This module provides the concrete implementation of `IndexClient` using
//! Solr's JSON update handler over `reqwest`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use solr_sink_shared::IndexDocument;
use tracing::{debug, error, info};
use url::Url;

use crate::config::SolrClientConfig;
use crate::errors::SolrError;
use crate::interfaces::IndexClient;
use crate::types::UpdateResponse;

/// Content type of every update request body.
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Solr client bound to one core or collection.
///
/// Documents are posted one at a time to `{url}/update` as a one-element
/// JSON array; commits go to the same handler with `commit=true`.
///
/// # Example
///
/// ```ignore
/// use solr_sink_repository::{IndexClient, SolrClient, SolrClientConfig};
///
/// let client = SolrClient::new(SolrClientConfig::new("http://localhost:8983/solr/books"))?;
/// client.add(&document).await?;
/// client.commit().await?;
/// ```
pub struct SolrClient {
    client: Client,
    endpoint: String,
    update_url: Url,
    commit_url: Url,
}

impl SolrClient {
    /// Create a new Solr client for the configured endpoint.
    ///
    /// No request is sent; the connection is established lazily on the first
    /// add.
    ///
    /// # Returns
    ///
    /// * `Ok(SolrClient)` - A new client instance
    /// * `Err(SolrError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(config: SolrClientConfig) -> Result<Self, SolrError> {
        let (update_url, commit_url) = Self::update_urls(&config.url)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .no_proxy()
            .build()
            .map_err(|e| SolrError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            connect_timeout_ms = config.connect_timeout.as_millis() as u64,
            read_timeout_ms = config.read_timeout.as_millis() as u64,
            "Created Solr client"
        );

        Ok(Self {
            client,
            endpoint: config.url,
            update_url,
            commit_url,
        })
    }

    /// Build the add and commit URLs from the base URL.
    fn update_urls(base: &str) -> Result<(Url, Url), SolrError> {
        let base = Url::parse(base).map_err(|e| SolrError::invalid_url(format!("{}: {}", base, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SolrError::invalid_url(format!(
                "unsupported scheme '{}' in {}",
                base.scheme(),
                base
            )));
        }

        let mut update_url = base.clone();
        update_url.set_query(None);
        {
            let mut segments = update_url
                .path_segments_mut()
                .map_err(|_| SolrError::invalid_url(format!("{} cannot be a base", base)))?;
            segments.pop_if_empty().push("update");
        }

        let mut commit_url = update_url.clone();
        update_url.query_pairs_mut().append_pair("wt", "json");
        commit_url
            .query_pairs_mut()
            .append_pair("commit", "true")
            .append_pair("wt", "json");

        Ok((update_url, commit_url))
    }

    /// Post a body to the update handler and parse the answer.
    async fn post_update(
        &self,
        url: &Url,
        body: String,
    ) -> Result<Option<UpdateResponse>, SolrError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match UpdateResponse::parse(&text) {
            Ok(None) if !status.is_success() => {
                error!(status = %status, "Update request failed without a response body");
                Err(SolrError::http(status.as_u16(), text))
            }
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                error!(status = %status, body = %text, "Update request failed");
                Err(SolrError::http(status.as_u16(), text))
            }
            Err(e) => Err(e),
        }
    }

    pub fn update_url(&self) -> &Url {
        &self.update_url
    }

    pub fn commit_url(&self) -> &Url {
        &self.commit_url
    }
}

#[async_trait]
impl IndexClient for SolrClient {
    async fn add(&self, document: &IndexDocument) -> Result<Option<UpdateResponse>, SolrError> {
        let body = serde_json::to_string(&[document])?;
        debug!(url = %self.update_url, doc = %body, "Adding document");

        let response = self.post_update(&self.update_url, body).await?;
        if let Some(ref response) = response {
            debug!(status = response.status, response = %response.raw, "Add response");
        }
        Ok(response)
    }

    async fn commit(&self) -> Result<Option<UpdateResponse>, SolrError> {
        let response = self.post_update(&self.commit_url, "[]".to_string()).await?;
        if let Some(ref response) = response {
            debug!(status = response.status, response = %response.raw, "Commit response");
        }
        Ok(response)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
