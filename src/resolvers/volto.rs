//! Volto series resolution

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::cache::MemoCell;
use crate::config::{
    DEFAULT_STABLE_KEEP, MIN_VOLTO_MAJOR, VOLTO_FALLBACK_MAJOR, VOLTO_FALLBACK_VERSION,
    VOLTO_PACKAGE,
};
use crate::error::RegistryError;
use crate::outcome::Outcome;
use crate::registries::NpmRegistry;
use crate::series::{SeriesGroups, SeriesKey, SeriesLatest};

/// Substrings marking a version as a pre-release.
const PRERELEASE_MARKERS: [&str; 3] = ["alpha", "beta", "rc"];

/// Groups published Volto releases into major series.
///
/// A pre-release is offered only while the registry promotes it through a
/// dist-tag; merely published nightlies stay out of the candidate list.
/// Each major keeps its newest few stable releases plus every promoted
/// pre-release. Live listings are memoized; a failed fetch degrades to the
/// fixed fallback release without being memoized.
pub struct VoltoSeriesResolver {
    registry: NpmRegistry,
    listing: MemoCell<SeriesGroups>,
    stable_keep: usize,
}

impl VoltoSeriesResolver {
    pub fn new(registry: NpmRegistry) -> Self {
        Self {
            registry,
            listing: MemoCell::new(),
            stable_keep: DEFAULT_STABLE_KEEP,
        }
    }

    /// Overrides how many stable releases each major keeps after trimming.
    pub fn with_stable_keep(mut self, stable_keep: usize) -> Self {
        self.stable_keep = stable_keep;
        self
    }

    /// Returns every offered major with its candidate releases: the newest
    /// stable entries first, promoted pre-releases after them.
    pub async fn fetch_series(&self) -> Outcome<SeriesGroups> {
        if let Some(groups) = self.listing.get() {
            debug!("Serving Volto series listing from cache");
            return Outcome::Live(groups);
        }

        match self.try_fetch().await {
            Ok(groups) => {
                self.listing.set(groups.clone());
                Outcome::Live(groups)
            }
            Err(err) => {
                warn!("Volto registry metadata unavailable, using fallback: {}", err);
                Outcome::Fallback(fallback_groups())
            }
        }
    }

    /// Returns the newest release per major, newest major first.
    ///
    /// Prefers the newest stable release; a major with only pre-releases
    /// resolves to its newest promoted pre-release.
    pub async fn latest(&self) -> Outcome<Vec<SeriesLatest>> {
        self.fetch_series().await.map(|groups| {
            groups
                .iter_desc()
                .filter_map(|(series, versions)| {
                    let newest_stable = versions.iter().rev().find(|v| !is_prerelease(v));
                    let pick = newest_stable.or_else(|| versions.last())?;
                    Some(SeriesLatest {
                        series: series.clone(),
                        version: pick.clone(),
                    })
                })
                .collect()
        })
    }

    /// Drops the memoized listing so the next call fetches fresh data.
    pub fn invalidate(&self) {
        debug!("Clearing memoized Volto series listing");
        self.listing.clear();
    }

    async fn try_fetch(&self) -> Result<SeriesGroups, RegistryError> {
        let packument = self.registry.fetch_packument(VOLTO_PACKAGE).await?;
        let tagged: HashSet<&str> = packument.dist_tags.values().map(String::as_str).collect();

        let mut groups = SeriesGroups::new();
        for version in packument.versions.keys() {
            let Some(major) = leading_major(version) else {
                continue;
            };
            if major < MIN_VOLTO_MAJOR {
                continue;
            }
            if is_prerelease(version) && !tagged.contains(version.as_str()) {
                continue;
            }
            groups.push(SeriesKey::major(major), version.clone());
        }
        groups.sort_groups();

        Ok(trim_groups(&groups, self.stable_keep))
    }
}

/// Major of a dotted version: the integer before the first dot.
fn leading_major(version: &str) -> Option<u64> {
    let (head, _) = version.split_once('.')?;
    head.parse().ok()
}

/// A version is a pre-release if it carries any of the marker substrings.
fn is_prerelease(version: &str) -> bool {
    PRERELEASE_MARKERS
        .iter()
        .any(|marker| version.contains(marker))
}

/// Keeps the newest `stable_keep` stable entries of each group plus every
/// pre-release, concatenated stable-then-prerelease.
fn trim_groups(groups: &SeriesGroups, stable_keep: usize) -> SeriesGroups {
    let mut trimmed = SeriesGroups::new();
    for (series, versions) in groups.iter_desc() {
        let (stable, pre): (Vec<&String>, Vec<&String>) =
            versions.iter().partition(|v| !is_prerelease(v));
        let skip = stable.len().saturating_sub(stable_keep);
        for version in stable.into_iter().skip(skip).chain(pre) {
            trimmed.push(series.clone(), version.clone());
        }
    }
    trimmed
}

fn fallback_groups() -> SeriesGroups {
    let mut groups = SeriesGroups::new();
    groups.push(
        SeriesKey::major(VOLTO_FALLBACK_MAJOR),
        VOLTO_FALLBACK_VERSION.to_string(),
    );
    groups
}
