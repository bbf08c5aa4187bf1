//! PyPI JSON API

use serde::Deserialize;

use crate::client::RegistryClient;
use crate::config::PYPI_URL;
use crate::error::RegistryError;

/// Release metadata returned by the PyPI JSON API.
#[derive(Debug, Deserialize)]
pub struct ReleaseMetadata {
    #[serde(default)]
    pub info: ReleaseInfo,
}

/// The `info` object of a release document.
#[derive(Debug, Default, Deserialize)]
pub struct ReleaseInfo {
    /// Trove classifiers declared by the release.
    #[serde(default)]
    pub classifiers: Vec<String>,
}

/// Fetcher for the PyPI JSON API.
pub struct PypiRegistry {
    client: RegistryClient,
    base_url: String,
}

impl PypiRegistry {
    /// Creates a PyPI fetcher for a custom base URL.
    pub fn new(client: RegistryClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Fetches the metadata of one exact release of a project.
    pub async fn fetch_release(
        &self,
        project: &str,
        version: &str,
    ) -> Result<ReleaseMetadata, RegistryError> {
        let url = format!("{}/pypi/{}/{}/json", self.base_url, project, version);
        self.client.get_json(&url).await
    }
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(RegistryClient::default(), PYPI_URL)
    }
}
