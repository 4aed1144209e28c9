//! reqwest-backed asset transport.

use super::AssetFetcher;
use crate::config::HttpConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Fetches assets over HTTP(S)
///
/// Certificate verification is off unless [`HttpConfig::verify_asset_tls`] is
/// set; catalog CDN responses are treated as non-adversarial.
#[derive(Clone, Debug)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
    verify_tls: bool,
}

impl HttpAssetFetcher {
    /// Build the HTTP client from the transport settings
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.asset_timeout)
            .timeout(config.asset_timeout)
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_asset_tls)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            verify_tls: config.verify_asset_tls,
        })
    }

    /// Whether this client verifies TLS certificates
    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            Error::download_failed(url, reason)
        })?;

        if !response.status().is_success() {
            return Err(Error::download_failed(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::download_failed(url, format!("failed to read body: {}", e)))?;
        Ok(body.to_vec())
    }
}
