//! Fetchers for the remote version sources
//!
//! - [`plone_dist`]: Plone release directory listing (HTML)
//! - [`pypi`]: PyPI JSON API (release metadata with classifiers)
//! - [`npm`]: npm registry API (packument and version manifests)

pub mod npm;
pub mod plone_dist;
pub mod pypi;

pub use npm::NpmRegistry;
pub use plone_dist::PloneDistIndex;
pub use pypi::PypiRegistry;
