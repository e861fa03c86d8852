//! Community module catalog retrieval
//!
//! The catalog is a JSON document listing every community module and its
//! released versions. Each fetch goes to the network; nothing is cached.

use modhub_common::CatalogModule;
use reqwest::StatusCode;
use std::time::Duration;

use super::error::FetchError;
use crate::config::CatalogConfig;

/// Well-known location of the community modules catalog
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/kyma-project/community-modules/main/model.json";

/// Fetches the module catalog from a configurable URL
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    client: reqwest::Client,
    url: String,
}

impl CatalogFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Build a fetcher whose HTTP client honours the configured timeout
    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self::with_client(client, config.url.clone()))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve and decode the catalog
    ///
    /// Single attempt: any status other than 200 is an error.
    pub async fn fetch(&self) -> Result<Vec<CatalogModule>, FetchError> {
        tracing::debug!(url = %self.url, "Fetching module catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let modules = decode_catalog(&body)?;
        tracing::debug!(modules = modules.len(), "Module catalog fetched");

        Ok(modules)
    }
}

impl Default for CatalogFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

/// Decode a catalog document
pub fn decode_catalog(body: &[u8]) -> Result<Vec<CatalogModule>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
