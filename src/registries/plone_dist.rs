//! Plone release distribution index

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::client::RegistryClient;
use crate::config::DIST_PLONE_URL;
use crate::error::RegistryError;

/// Matches directory links in the release listing, e.g. `href="6.1.4/"` or
/// `href="6.2.0b2/"`.
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(\d+\.\d+\.\d+(?:(?:a|b|rc)\d+)?)/?""#).unwrap()
});

/// Fetcher for the Plone release directory listing.
pub struct PloneDistIndex {
    client: RegistryClient,
    url: String,
}

impl PloneDistIndex {
    /// Creates an index fetcher for a custom listing URL.
    pub fn new(client: RegistryClient, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Fetches the listing and extracts every release version token, in
    /// page order.
    pub async fn fetch_versions(&self) -> Result<Vec<String>, RegistryError> {
        let body = self.client.get_text(&self.url).await?;

        let versions: Vec<String> = HREF_RE
            .captures_iter(&body)
            .map(|caps| caps[1].to_string())
            .collect();

        debug!("Found {} releases in the dist index", versions.len());
        Ok(versions)
    }
}

impl Default for PloneDistIndex {
    fn default() -> Self {
        Self::new(RegistryClient::default(), DIST_PLONE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const LISTING: &str = r#"<html><body>
<a href="../">../</a>
<a href="5.2.14/">5.2.14/</a>
<a href="6.0.11/">6.0.11/</a>
<a href="6.1.4/">6.1.4/</a>
<a href="6.2.0b2/">6.2.0b2/</a>
<a href="archive/">archive/</a>
</body></html>"#;

    #[tokio::test]
    async fn fetch_versions_extracts_release_tokens_in_page_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/release/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(LISTING)
            .create_async()
            .await;

        let index = PloneDistIndex::new(RegistryClient::new(), &format!("{}/release/", server.url()));
        let versions = index.fetch_versions().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            versions,
            vec![
                "5.2.14".to_string(),
                "6.0.11".to_string(),
                "6.1.4".to_string(),
                "6.2.0b2".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn fetch_versions_returns_empty_for_listing_without_releases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/release/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><a href=\"../\">../</a></body></html>")
            .create_async()
            .await;

        let index = PloneDistIndex::new(RegistryClient::new(), &format!("{}/release/", server.url()));
        let versions = index.fetch_versions().await.unwrap();

        mock.assert_async().await;
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn fetch_versions_reports_unreachable_listing() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/release/")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let index = PloneDistIndex::new(RegistryClient::new(), &format!("{}/release/", server.url()));
        let result = index.fetch_versions().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Status { .. })));
    }
}
