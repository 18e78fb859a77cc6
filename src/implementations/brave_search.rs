use std::time::Duration;
use async_trait::async_trait;
use log::{ debug, warn };
use serde::Deserialize;
use thiserror::Error;

use crate::config::ValidatorConfig;
use crate::errors::{ ValidatorError, ValidatorResult };
use crate::models::claim::EvidenceItem;
use crate::traits::evidence_retriever::EvidenceRetriever;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },

    #[error("Failed to parse search response: {0}")] ParseError(String),
}

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWebResults>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BraveResult {
    title: String,
    url: String,
    description: String,
}

impl From<BraveResult> for EvidenceItem {
    fn from(result: BraveResult) -> Self {
        EvidenceItem {
            title: result.title,
            url: result.url,
            snippet: result.description,
        }
    }
}

/// Turn a Brave web-search body into evidence, keeping relevance order.
/// A body without `web.results` is a valid empty answer.
pub fn parse_search_response(body: &str) -> Result<Vec<EvidenceItem>, SearchError> {
    let response: BraveResponse = serde_json
        ::from_str(body)
        .map_err(|e| SearchError::ParseError(e.to_string()))?;

    Ok(
        response.web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .map(EvidenceItem::from)
            .collect()
    )
}

/// Evidence retriever backed by the Brave Search web endpoint
#[derive(Clone)]
pub struct BraveSearch {
    http_client: reqwest::Client,
    api_key: String,
    api_endpoint: String,
}

impl BraveSearch {
    pub fn new(
        api_key: impl Into<String>,
        api_endpoint: impl Into<String>,
        timeout: Duration
    ) -> ValidatorResult<Self> {
        let http_client = reqwest::Client
            ::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ValidatorError::ExternalServiceError {
                service: "Brave Search".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            api_endpoint: api_endpoint.into(),
        })
    }

    /// Build a retriever when the config carries a search key; `None` means degraded mode
    pub fn from_config(config: &ValidatorConfig) -> ValidatorResult<Option<Self>> {
        match config.search_api_key() {
            Some(key) =>
                Ok(
                    Some(
                        Self::new(
                            key,
                            config.search_api.api_endpoint.clone(),
                            Duration::from_secs(config.request_timeout_secs)
                        )?
                    )
                ),
            None => Ok(None),
        }
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<EvidenceItem>, SearchError> {
        debug!("Brave search endpoint: {}", self.api_endpoint);
        let count = limit.to_string();

        let response = self.http_client
            .get(&self.api_endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", count.as_str())])
            .send().await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::HttpError { status, message });
        }

        let body = response.text().await.map_err(|e| SearchError::ParseError(e.to_string()))?;
        let mut items = parse_search_response(&body)?;
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl EvidenceRetriever for BraveSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceItem> {
        debug!("Brave query: {:?} (limit {})", query, limit);
        match self.fetch(query, limit).await {
            Ok(items) => {
                debug!("Search returned {} result(s)", items.len());
                items
            }
            Err(e) => {
                warn!("Web search failed: {}", e);
                Vec::new()
            }
        }
    }
}
