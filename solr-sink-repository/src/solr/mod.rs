//! Solr implementation of the index client.
//!
//! This module provides a concrete implementation of `IndexClient` that
//! speaks Solr's JSON update API over HTTP.

mod client;

pub use client::SolrClient;
