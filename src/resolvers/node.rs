//! Node.js and pnpm compatibility lookup

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::MemoCache;
use crate::config::{NODE_FALLBACK_VERSIONS, PNPM_FALLBACK_MAJOR, VOLTO_PACKAGE};
use crate::outcome::Outcome;
use crate::registries::NpmRegistry;

static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static PNPM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^pnpm@(\d+)").unwrap());

/// Resolves the Node.js majors and pnpm major a Volto release expects from
/// its published manifest.
///
/// The engine constraint is not interpreted as a semver range. Every integer
/// token in it is harvested as a candidate major, so `^20 || >=22` yields
/// `20` and `22` without any range evaluation. Node lookups are memoized per
/// argument, fallback outcomes included; pnpm lookups are not memoized.
pub struct NodeCompatResolver {
    registry: NpmRegistry,
    cache: MemoCache<String, Outcome<Vec<String>>>,
}

impl NodeCompatResolver {
    pub fn new(registry: NpmRegistry) -> Self {
        Self {
            registry,
            cache: MemoCache::new(),
        }
    }

    /// Returns the Node.js majors named by a Volto release's engine
    /// constraint, deduplicated and sorted ascending.
    pub async fn node_versions(&self, volto_version: &str) -> Outcome<Vec<String>> {
        if let Some(cached) = self.cache.get(&volto_version.to_string()) {
            debug!("Serving Node versions for Volto {} from cache", volto_version);
            return cached;
        }

        let outcome = self.lookup(volto_version).await;
        self.cache.insert(volto_version.to_string(), outcome.clone());
        outcome
    }

    /// Returns the major of the pnpm version pinned by a Volto release's
    /// `packageManager` field.
    pub async fn pnpm_version(&self, volto_version: &str) -> Outcome<String> {
        let manifest = match self.registry.fetch_manifest(VOLTO_PACKAGE, volto_version).await {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(
                    "npm metadata unavailable for Volto {}: {}, using fallback pnpm version",
                    volto_version, err
                );
                return Outcome::Fallback(PNPM_FALLBACK_MAJOR.to_string());
            }
        };

        let Some(major) = manifest.package_manager.as_deref().and_then(pnpm_major) else {
            debug!(
                "Volto {} pins no pnpm version, using fallback",
                volto_version
            );
            return Outcome::Fallback(PNPM_FALLBACK_MAJOR.to_string());
        };
        Outcome::Live(major)
    }

    /// Drops all memoized lookups so the next call fetches fresh data.
    pub fn invalidate(&self) {
        debug!("Clearing memoized Node lookups");
        self.cache.clear();
    }

    async fn lookup(&self, volto_version: &str) -> Outcome<Vec<String>> {
        let manifest = match self.registry.fetch_manifest(VOLTO_PACKAGE, volto_version).await {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(
                    "npm metadata unavailable for Volto {}: {}, using fallback Node versions",
                    volto_version, err
                );
                return Outcome::Fallback(fallback_versions());
            }
        };

        let Some(constraint) = manifest.engines.node else {
            debug!(
                "Volto {} declares no Node engine constraint, using fallback",
                volto_version
            );
            return Outcome::Fallback(fallback_versions());
        };

        let majors = harvest_majors(&constraint);
        if majors.is_empty() {
            return Outcome::Fallback(fallback_versions());
        }
        Outcome::Live(majors)
    }
}

/// Every integer token in the constraint, deduplicated, ascending.
fn harvest_majors(constraint: &str) -> Vec<String> {
    let mut majors: Vec<u64> = INT_RE
        .find_iter(constraint)
        .filter_map(|token| token.as_str().parse().ok())
        .collect();
    majors.sort_unstable();
    majors.dedup();
    majors.into_iter().map(|major| major.to_string()).collect()
}

fn pnpm_major(identifier: &str) -> Option<String> {
    PNPM_RE
        .captures(identifier)
        .map(|caps| caps[1].to_string())
}

fn fallback_versions() -> Vec<String> {
    NODE_FALLBACK_VERSIONS
        .iter()
        .map(|version| version.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RegistryClient;
    use mockito::{Server, ServerGuard};
    use rstest::rstest;

    const MANIFEST: &str = r#"{
        "name": "@plone/volto",
        "version": "18.32.1",
        "engines": {"node": "^20 || ^22"},
        "packageManager": "pnpm@9.15.0"
    }"#;

    fn resolver_for(server: &ServerGuard) -> NodeCompatResolver {
        NodeCompatResolver::new(NpmRegistry::new(RegistryClient::new(), &server.url()))
    }

    #[rstest]
    #[case("^20 || ^22", vec!["20", "22"])]
    #[case(">=18", vec!["18"])]
    #[case("^18.0.0 || >=20", vec!["0", "18", "20"])]
    #[case("20.x", vec!["20"])]
    #[case("", vec![])]
    fn harvest_collects_every_integer_token(#[case] constraint: &str, #[case] expected: Vec<&str>) {
        assert_eq!(harvest_majors(constraint), expected);
    }

    #[rstest]
    #[case("pnpm@9.15.0", Some("9"))]
    #[case("pnpm@8.6.0", Some("8"))]
    #[case("yarn@4.0.1", None)]
    #[case("pnpm@", None)]
    fn pnpm_major_requires_the_pnpm_prefix(
        #[case] identifier: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(pnpm_major(identifier), expected.map(String::from));
    }

    #[tokio::test]
    async fn reads_node_majors_from_the_engine_constraint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/18.32.1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(MANIFEST)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.node_versions("18.32.1").await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            Outcome::Live(vec!["20".to_string(), "22".to_string()])
        );
    }

    #[tokio::test]
    async fn missing_engine_constraint_falls_back() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/17.0.0")
            .with_status(200)
            .with_body(r#"{"name": "@plone/volto", "version": "17.0.0"}"#)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.node_versions("17.0.0").await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            Outcome::Fallback(vec!["20".to_string(), "22".to_string()])
        );
    }

    #[tokio::test]
    async fn memoizes_node_lookups_per_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/18.32.1")
            .with_status(200)
            .with_body(MANIFEST)
            .expect(1)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let first = resolver.node_versions("18.32.1").await;
        let second = resolver.node_versions("18.32.1").await;

        mock.assert_async().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn registry_failure_falls_back_and_the_fallback_is_memoized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/18.32.1")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let first = resolver.node_versions("18.32.1").await;
        let second = resolver.node_versions("18.32.1").await;

        mock.assert_async().await;
        assert!(first.is_fallback());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn extracts_the_pinned_pnpm_major() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/18.32.1")
            .with_status(200)
            .with_body(MANIFEST)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.pnpm_version("18.32.1").await;

        mock.assert_async().await;
        assert_eq!(outcome, Outcome::Live("9".to_string()));
    }

    #[tokio::test]
    async fn pnpm_lookups_are_not_memoized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/18.32.1")
            .with_status(200)
            .with_body(MANIFEST)
            .expect(2)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        resolver.pnpm_version("18.32.1").await;
        resolver.pnpm_version("18.32.1").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_package_manager_falls_back() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@plone%2Fvolto/17.0.0")
            .with_status(200)
            .with_body(r#"{"name": "@plone/volto", "version": "17.0.0"}"#)
            .create_async()
            .await;

        let resolver = resolver_for(&server);
        let outcome = resolver.pnpm_version("17.0.0").await;

        mock.assert_async().await;
        assert_eq!(outcome, Outcome::Fallback("9".to_string()));
    }
}
