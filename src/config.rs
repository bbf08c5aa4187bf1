use std::time::Duration;

// =============================================================================
// Remote sources
// =============================================================================

/// Directory listing of published Plone releases.
pub const DIST_PLONE_URL: &str = "https://dist.plone.org/release/";

/// Base URL of the PyPI JSON API.
pub const PYPI_URL: &str = "https://pypi.org";

/// Base URL of the npm registry.
pub const NPM_URL: &str = "https://registry.npmjs.org";

/// PyPI project whose classifiers declare supported Python versions.
pub const PLONE_BACKEND_PACKAGE: &str = "Products.CMFPlone";

/// npm package of the Volto frontend framework.
pub const VOLTO_PACKAGE: &str = "@plone/volto";

/// User agent sent with every registry request.
pub const USER_AGENT: &str = "plone-versions";

/// Timeout applied to each registry request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// =============================================================================
// Selection policy
// =============================================================================

/// Oldest Plone major series offered for new projects.
pub const MIN_PLONE_MAJOR: u64 = 6;

/// Oldest Volto major series offered for new projects.
pub const MIN_VOLTO_MAJOR: u64 = 17;

/// How many stable releases to keep per Volto major after trimming.
pub const DEFAULT_STABLE_KEEP: usize = 5;

// =============================================================================
// Fallback values
// =============================================================================

/// Plone series offered when the release index is unreachable.
pub const PLONE_FALLBACK_SERIES: (u64, u64) = (6, 1);

/// Volto major offered when the npm registry is unreachable.
pub const VOLTO_FALLBACK_MAJOR: u64 = 18;

/// Volto release offered when the npm registry is unreachable.
pub const VOLTO_FALLBACK_VERSION: &str = "18.32.1";

/// Python versions offered when classifiers cannot be fetched, ascending.
pub const PYTHON_FALLBACK_VERSIONS: &[&str] = &["3.12", "3.13"];

/// Node.js majors offered when engine constraints cannot be fetched, ascending.
pub const NODE_FALLBACK_VERSIONS: &[&str] = &["20", "22"];

/// pnpm major offered when the packageManager field cannot be fetched.
pub const PNPM_FALLBACK_MAJOR: &str = "9";
