//! Python interpreter compatibility lookup

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::MemoCache;
use crate::config::{PLONE_BACKEND_PACKAGE, PYTHON_FALLBACK_VERSIONS};
use crate::outcome::Outcome;
use crate::registries::PypiRegistry;
use crate::resolvers::PloneSeriesResolver;
use crate::series::SeriesKey;

/// Trove classifier announcing support for a Python 3 minor version.
static CLASSIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Programming Language :: Python :: (3\.\d+)$").unwrap()
});

/// Resolves the Python versions a Plone release supports from its published
/// PyPI classifiers.
///
/// Accepts either a full release like `6.1.4` or a bare series label like
/// `6.1`, which is first resolved to the newest release in that series.
/// Lookups are memoized per argument, fallback outcomes included.
pub struct PythonCompatResolver {
    registry: PypiRegistry,
    series: Arc<PloneSeriesResolver>,
    cache: MemoCache<String, Outcome<Vec<String>>>,
}

impl PythonCompatResolver {
    pub fn new(registry: PypiRegistry, series: Arc<PloneSeriesResolver>) -> Self {
        Self {
            registry,
            series,
            cache: MemoCache::new(),
        }
    }

    /// Returns the supported Python versions for a Plone release, sorted by
    /// minor version ascending.
    pub async fn python_versions(&self, plone_version: &str) -> Outcome<Vec<String>> {
        if let Some(cached) = self.cache.get(&plone_version.to_string()) {
            debug!("Serving Python versions for Plone {} from cache", plone_version);
            return cached;
        }

        let outcome = self.lookup(plone_version).await;
        self.cache.insert(plone_version.to_string(), outcome.clone());
        outcome
    }

    /// Drops all memoized lookups so the next call fetches fresh data.
    pub fn invalidate(&self) {
        debug!("Clearing memoized Python lookups");
        self.cache.clear();
    }

    async fn lookup(&self, plone_version: &str) -> Outcome<Vec<String>> {
        // One dot means a series label rather than a concrete release.
        let release = if plone_version.matches('.').count() == 1 {
            let Some(version) = self.newest_in_series(plone_version).await else {
                warn!(
                    "No release known for Plone series {}, using fallback Python versions",
                    plone_version
                );
                return Outcome::Fallback(fallback_versions());
            };
            version
        } else {
            plone_version.to_string()
        };

        let metadata = match self
            .registry
            .fetch_release(PLONE_BACKEND_PACKAGE, &release)
            .await
        {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(
                    "PyPI metadata unavailable for Plone {}: {}, using fallback Python versions",
                    release, err
                );
                return Outcome::Fallback(fallback_versions());
            }
        };

        let mut versions: Vec<String> = metadata
            .info
            .classifiers
            .iter()
            .filter_map(|classifier| CLASSIFIER_RE.captures(classifier))
            .map(|caps| caps[1].to_string())
            .collect();
        if versions.is_empty() {
            warn!(
                "No Python classifiers published for Plone {}, using fallback Python versions",
                release
            );
            return Outcome::Fallback(fallback_versions());
        }

        versions.sort_by_key(|version| minor_of(version));
        Outcome::Live(versions)
    }

    async fn newest_in_series(&self, label: &str) -> Option<String> {
        let key: SeriesKey = label.parse().ok()?;
        let groups = self.series.fetch_series().await.into_value();
        groups.get(&key)?.last().cloned()
    }
}

fn minor_of(version: &str) -> u64 {
    version
        .split('.')
        .nth(1)
        .and_then(|minor| minor.parse().ok())
        .unwrap_or(0)
}

fn fallback_versions() -> Vec<String> {
    PYTHON_FALLBACK_VERSIONS
        .iter()
        .map(|version| version.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RegistryClient;
    use crate::registries::PloneDistIndex;
    use mockito::{Server, ServerGuard};

    const RELEASE_JSON: &str = r#"{
        "info": {
            "classifiers": [
                "Development Status :: 5 - Production/Stable",
                "Programming Language :: Python :: 3.13",
                "Programming Language :: Python :: 3.10",
                "Programming Language :: Python :: 3.12",
                "Programming Language :: Python :: 3.11",
                "Programming Language :: Python :: 3 :: Only"
            ]
        }
    }"#;

    fn resolver_for(server: &ServerGuard) -> PythonCompatResolver {
        let client = RegistryClient::new();
        let index = PloneDistIndex::new(client.clone(), &format!("{}/release/", server.url()));
        let series = Arc::new(PloneSeriesResolver::new(index));
        PythonCompatResolver::new(PypiRegistry::new(client, &server.url()), series)
    }

    #[tokio::test]
    async fn collects_python3_classifiers_sorted_by_minor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/Products.CMFPlone/6.1.4/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(RELEASE_JSON)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.python_versions("6.1.4").await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            Outcome::Live(vec![
                "3.10".to_string(),
                "3.11".to_string(),
                "3.12".to_string(),
                "3.13".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn series_label_resolves_to_newest_release_first() {
        let mut server = Server::new_async().await;
        let listing = server
            .mock("GET", "/release/")
            .with_status(200)
            .with_body(r#"<a href="6.1.0/">6.1.0/</a> <a href="6.1.4/">6.1.4/</a>"#)
            .create_async()
            .await;
        let release = server
            .mock("GET", "/pypi/Products.CMFPlone/6.1.4/json")
            .with_status(200)
            .with_body(RELEASE_JSON)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.python_versions("6.1").await;

        listing.assert_async().await;
        release.assert_async().await;
        assert!(outcome.is_live());
    }

    #[tokio::test]
    async fn memoizes_lookups_per_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/Products.CMFPlone/6.1.4/json")
            .with_status(200)
            .with_body(RELEASE_JSON)
            .expect(1)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let first = resolver.python_versions("6.1.4").await;
        let second = resolver.python_versions("6.1.4").await;

        mock.assert_async().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn registry_failure_falls_back_and_the_fallback_is_memoized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/Products.CMFPlone/6.1.4/json")
            .with_status(500)
            .with_body("server error")
            .expect(1)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let first = resolver.python_versions("6.1.4").await;
        let second = resolver.python_versions("6.1.4").await;

        mock.assert_async().await;
        assert_eq!(
            first,
            Outcome::Fallback(vec!["3.12".to_string(), "3.13".to_string()])
        );
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_classifiers_fall_back() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/Products.CMFPlone/6.0.11/json")
            .with_status(200)
            .with_body(r#"{"info": {"classifiers": ["Framework :: Plone"]}}"#)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.python_versions("6.0.11").await;

        mock.assert_async().await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/Products.CMFPlone/6.1.4/json")
            .with_status(200)
            .with_body(RELEASE_JSON)
            .expect(2)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        resolver.python_versions("6.1.4").await;
        resolver.invalidate();
        resolver.python_versions("6.1.4").await;

        mock.assert_async().await;
    }
}
