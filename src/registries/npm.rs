//! npm registry API

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::client::RegistryClient;
use crate::config::NPM_URL;
use crate::error::RegistryError;

/// Whole-package metadata document (the packument).
#[derive(Debug, Deserialize)]
pub struct Packument {
    /// Named pointers to promoted versions, e.g. `latest`, `alpha`.
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: HashMap<String, String>,
    /// All published versions. Kept in registry document order so
    /// downstream stable sorts stay deterministic for equal keys.
    #[serde(default)]
    pub versions: IndexMap<String, serde_json::Value>,
}

/// Metadata of one published version.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub engines: Engines,
    #[serde(default, rename = "packageManager")]
    pub package_manager: Option<String>,
}

/// Declared engine constraints of a version.
#[derive(Debug, Default, Deserialize)]
pub struct Engines {
    pub node: Option<String>,
}

/// Fetcher for the npm registry API.
pub struct NpmRegistry {
    client: RegistryClient,
    base_url: String,
}

impl NpmRegistry {
    /// Creates an npm fetcher for a custom base URL.
    pub fn new(client: RegistryClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Fetches the whole-package metadata document.
    pub async fn fetch_packument(&self, package_name: &str) -> Result<Packument, RegistryError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            Self::encode_package_name(package_name)
        );
        self.client.get_json(&url).await
    }

    /// Fetches the metadata of one published version.
    pub async fn fetch_manifest(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<VersionManifest, RegistryError> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            Self::encode_package_name(package_name),
            version
        );
        self.client.get_json(&url).await
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(RegistryClient::default(), NPM_URL)
    }
}
