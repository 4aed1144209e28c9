//! Catalog search client
//!
//! One form-encoded POST per search, decoded into [`AppRecord`]s. The search
//! client always verifies TLS certificates and never retries.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::types::{AppRecord, Country};
use serde::{Deserialize, Serialize};
use url::Url;

/// Media and entity type sent with every search
const SOFTWARE: &str = "software";

/// Decoded search response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Count reported by the catalog
    #[serde(rename = "resultCount", default)]
    pub result_count: usize,
    /// Matching apps, in catalog order
    #[serde(default)]
    pub results: Vec<AppRecord>,
}

/// Searches the app catalog
#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: Url,
    limit: u32,
}

impl CatalogClient {
    /// Build a client from the transport settings
    ///
    /// # Errors
    /// Returns error if the search URL is invalid or the HTTP client cannot be
    /// created
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.search_url).map_err(|e| Error::Config {
            message: format!("invalid search URL {}: {}", config.search_url, e),
            key: Some("http.search_url".to_string()),
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.search_timeout)
            .timeout(config.search_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            limit: config.result_limit,
        })
    }

    /// Search the storefront of `country` for apps matching `term`
    ///
    /// # Errors
    /// - [`Error::NotFound`] when nothing matches
    /// - [`Error::SearchFailed`] on a non-success status
    /// - [`Error::ParseFailed`] when the body is not a search result document
    /// - [`Error::Network`] on transport failure
    pub async fn search(&self, term: &str, country: &Country) -> Result<SearchResults> {
        let limit = self.limit.to_string();
        let form = [
            ("term", term),
            ("country", country.code),
            ("media", SOFTWARE),
            ("entity", SOFTWARE),
            ("limit", limit.as_str()),
        ];

        tracing::debug!(term = %term, country = country.code, url = %self.endpoint, "searching catalog");
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "catalog search rejected");
            return Err(Error::SearchFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let results: SearchResults =
            serde_json::from_str(&body).map_err(|e| Error::ParseFailed(e.to_string()))?;

        if results.result_count == 0 || results.results.is_empty() {
            return Err(Error::NotFound(term.to_string()));
        }
        tracing::debug!(count = results.results.len(), "catalog search returned results");
        Ok(results)
    }
}
