//! Shared HTTP client for registry access

use reqwest::redirect;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{REQUEST_TIMEOUT, USER_AGENT};
use crate::error::RegistryError;

/// HTTP client shared by every registry fetcher.
///
/// Applies the request timeout, follows redirects, and sends a fixed user
/// agent. Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
}

impl RegistryClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .redirect(redirect::Policy::limited(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetches a URL as plain text.
    pub async fn get_text(&self, url: &str) -> Result<String, RegistryError> {
        let response = self.get_checked(url).await?;

        response.text().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", url, e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }

    /// Fetches a URL and decodes its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RegistryError> {
        let response = self.get_checked(url).await?;

        response.json().await.map_err(|e| {
            warn!("Failed to decode JSON from {}: {}", url, e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, RegistryError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Registry returned status {}: {}", status, url);
            return Err(RegistryError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}
