// src/services/lookup.rs

//! Local-search lookup service.
//!
//! Queries the search endpoint once per organisation and takes phone and
//! website from the first returned entry. No failure leaves this module: a
//! bad status, transport error or unexpected payload all become an empty
//! result so one bad lookup never aborts the batch.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Candidate, EnrichmentResult, LookupConfig};
use crate::utils::http::create_async_client;

/// Anything that can enrich a candidate. Implementations must not fail.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn lookup(&self, candidate: &Candidate) -> EnrichmentResult;
}

/// Result of a single search call before it is collapsed to defaults.
#[derive(Debug)]
pub enum LookupOutcome {
    /// At least one entry came back; fields taken from the first one
    Found(EnrichmentResult),
    /// Well-formed response without any entries
    NoMatch,
    /// Transport error, non-success status or malformed payload
    Failed(AppError),
}

impl LookupOutcome {
    /// Collapse to a result, logging anything that was not a match.
    pub fn into_result(self, query: &str) -> EnrichmentResult {
        match self {
            Self::Found(result) => result,
            Self::NoMatch => {
                log::info!("No resources found for query: {}", query);
                EnrichmentResult::default()
            }
            Self::Failed(error) => {
                log::error!("{}", error);
                EnrichmentResult::default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "resourceSets")]
    resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Deserialize)]
struct ResourceSet {
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "PhoneNumber", default)]
    phone_number: Option<String>,
    #[serde(rename = "Website", default)]
    website: Option<String>,
}

/// Client for the local-search API.
pub struct LookupClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl LookupClient {
    /// Create a new lookup client with the given configuration.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Run one search and classify the response.
    pub async fn search(&self, query: &str) -> LookupOutcome {
        match self.fetch(query).await {
            Ok(Some(result)) => LookupOutcome::Found(result),
            Ok(None) => LookupOutcome::NoMatch,
            Err(error) => LookupOutcome::Failed(error),
        }
    }

    async fn fetch(&self, query: &str) -> Result<Option<EnrichmentResult>> {
        // reqwest errors carry the request URL, which includes the key
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::lookup(query, e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::lookup(query, e.without_url()))?;

        if !status.is_success() {
            return Err(AppError::lookup(query, format!("status {status}: {body}")));
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::lookup(query, format!("unexpected payload: {e}")))?;

        let resources = parsed
            .resource_sets
            .into_iter()
            .next()
            .ok_or_else(|| AppError::lookup(query, "response has no resource sets"))?
            .resources;

        Ok(resources.into_iter().next().map(|first| EnrichmentResult {
            phone: first.phone_number.unwrap_or_default(),
            website: first.website.unwrap_or_default(),
        }))
    }
}

#[async_trait]
impl Enricher for LookupClient {
    async fn lookup(&self, candidate: &Candidate) -> EnrichmentResult {
        let query = candidate.query();
        self.search(&query).await.into_result(&query)
    }
}
