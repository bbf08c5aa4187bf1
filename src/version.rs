//! Total ordering over mixed-syntax version strings

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Matches a dotted numeric base with an optional pre-release suffix in the
/// compact form (`6.2.0a1`, `6.2.0rc3`) or the hyphenated form
/// (`19.0.0-alpha.26`, `19.0.0-rc.2`).
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)(?:-?(alpha|beta|rc|a|b)\.?(\d+))?").unwrap()
});

/// Pre-release stage of a version.
///
/// Variant order is the release order, so the derived `Ord` ranks
/// alpha < beta < release candidate < stable, and numbered pre-releases of
/// the same stage rank by their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha(u64),
    Beta(u64),
    Rc(u64),
    Stable,
}

/// Comparable key derived from a published version string.
///
/// Used only for sorting; never serialized or displayed. Stable releases
/// order after every pre-release of the same numeric base, and bases compare
/// element-wise with missing trailing components treated as zero, so
/// `"6.1"` and `"6.1.0"` compare equal.
#[derive(Debug, Clone)]
pub struct VersionKey {
    base: Vec<u64>,
    pre: PreRelease,
}

impl VersionKey {
    /// Parses any of the published version syntaxes into a comparable key.
    ///
    /// Examples:
    /// - `"6.1.4"` -> base (6, 1, 4), stable
    /// - `"6.2.0b2"` -> base (6, 2, 0), beta 2
    /// - `"19.0.0-alpha.26"` -> base (19, 0, 0), alpha 26
    ///
    /// Input without a leading dotted-numeric run yields a sentinel key that
    /// orders before every parsed key; parsing never fails on stray tokens.
    pub fn parse(raw: &str) -> Self {
        let Some(caps) = VERSION_RE.captures(raw) else {
            return Self::sentinel();
        };

        let base = caps[1]
            .split('.')
            .filter_map(|part| part.parse().ok())
            .collect();

        let pre = match (caps.get(2), caps.get(3)) {
            (Some(tag), Some(number)) => {
                let number = number.as_str().parse().unwrap_or(0);
                match tag.as_str() {
                    "a" | "alpha" => PreRelease::Alpha(number),
                    "b" | "beta" => PreRelease::Beta(number),
                    _ => PreRelease::Rc(number),
                }
            }
            _ => PreRelease::Stable,
        };

        Self { base, pre }
    }

    fn sentinel() -> Self {
        Self {
            base: Vec::new(),
            pre: PreRelease::Alpha(0),
        }
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // The sentinel for unparseable input has an empty base and orders
        // strictly before every parsed key, including all-zero bases.
        if self.base.is_empty() || other.base.is_empty() {
            return self
                .base
                .len()
                .cmp(&other.base.len())
                .then(self.pre.cmp(&other.pre));
        }

        let len = self.base.len().max(other.base.len());
        for i in 0..len {
            let a = self.base.get(i).copied().unwrap_or(0);
            let b = other.base.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        self.pre.cmp(&other.pre)
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}
