//! Resolution policies layered over the registry fetchers
//!
//! - [`PloneSeriesResolver`]: groups backend releases into major.minor series
//! - [`VoltoSeriesResolver`]: groups frontend releases into major series
//! - [`PythonCompatResolver`]: Python versions supported by a Plone release
//! - [`NodeCompatResolver`]: Node.js and pnpm versions for a Volto release

mod node;
mod plone;
mod python;
mod volto;

pub use node::NodeCompatResolver;
pub use plone::PloneSeriesResolver;
pub use python::PythonCompatResolver;
pub use volto::VoltoSeriesResolver;

use std::sync::Arc;

use crate::client::RegistryClient;
use crate::config::{DIST_PLONE_URL, NPM_URL, PYPI_URL};
use crate::registries::{NpmRegistry, PloneDistIndex, PypiRegistry};

/// The full resolver set sharing one HTTP client.
///
/// The Python resolver shares the Plone series resolver so that a series
/// label lookup reuses the memoized release listing.
pub struct Resolvers {
    pub plone: Arc<PloneSeriesResolver>,
    pub volto: VoltoSeriesResolver,
    pub python: PythonCompatResolver,
    pub node: NodeCompatResolver,
}

impl Resolvers {
    /// Builds resolvers against the production registries.
    pub fn new() -> Self {
        Self::with_base_urls(DIST_PLONE_URL, PYPI_URL, NPM_URL)
    }

    /// Builds resolvers against explicit base URLs, for tests and mirrors.
    pub fn with_base_urls(dist_url: &str, pypi_url: &str, npm_url: &str) -> Self {
        let client = RegistryClient::new();
        let plone = Arc::new(PloneSeriesResolver::new(PloneDistIndex::new(
            client.clone(),
            dist_url,
        )));
        Self {
            volto: VoltoSeriesResolver::new(NpmRegistry::new(client.clone(), npm_url)),
            python: PythonCompatResolver::new(
                PypiRegistry::new(client.clone(), pypi_url),
                Arc::clone(&plone),
            ),
            node: NodeCompatResolver::new(NpmRegistry::new(client, npm_url)),
            plone,
        }
    }

    /// Drops every memoized result so subsequent lookups fetch fresh data.
    pub fn invalidate_all(&self) {
        self.plone.invalidate();
        self.volto.invalidate();
        self.python.invalidate();
        self.node.invalidate();
    }
}

impl Default for Resolvers {
    fn default() -> Self {
        Self::new()
    }
}
