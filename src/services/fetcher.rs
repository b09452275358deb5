// src/services/fetcher.rs

//! Recall fetcher service.
//!
//! Performs one GET against the records endpoint and parses the
//! `{total_count, results}` envelope. Retries are left to the caller.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ApiPage};
use crate::services::query::QueryParams;
use crate::utils::http;

/// Anything able to serve pages of the recall dataset.
#[async_trait]
pub trait RecallSource: Send + Sync {
    /// Fetch a single page.
    async fn fetch_page(&self, query: &QueryParams) -> Result<ApiPage>;

    /// Check the source answers with a well-formed envelope.
    ///
    /// Returns the size of the remote dataset.
    async fn probe(&self) -> Result<u64> {
        let page = self.fetch_page(&QueryParams::probe()).await?;
        Ok(page.total_count)
    }
}

/// HTTP implementation of [`RecallSource`].
#[derive(Debug, Clone)]
pub struct RecallFetcher {
    client: Client,
    endpoint: Url,
}

impl RecallFetcher {
    /// Create a fetcher with its own client built from the API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = http::create_async_client(config)?;
        Self::with_client(client, &config.endpoint)
    }

    /// Create a fetcher sharing an existing client.
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RecallSource for RecallFetcher {
    async fn fetch_page(&self, query: &QueryParams) -> Result<ApiPage> {
        log::debug!(
            "Fetching recalls: offset={}, limit={}, filtered={}",
            query.offset,
            query.limit,
            query.where_clause.is_some()
        );

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query.to_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Remote {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(AppError::from_transport)?;
        serde_json::from_str(&body).map_err(AppError::malformed)
    }
}
