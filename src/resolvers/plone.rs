//! Plone series resolution

use tracing::{debug, warn};

use crate::cache::MemoCell;
use crate::config::{MIN_PLONE_MAJOR, PLONE_FALLBACK_SERIES};
use crate::error::RegistryError;
use crate::outcome::Outcome;
use crate::registries::PloneDistIndex;
use crate::series::{SeriesGroups, SeriesKey, SeriesLatest};

/// Groups published Plone releases into major.minor series.
///
/// Majors below the floor are dropped outright. Live listings are memoized
/// for the process lifetime; a failed fetch degrades to the fixed fallback
/// series without being memoized, so a later call retries the index.
pub struct PloneSeriesResolver {
    index: PloneDistIndex,
    listing: MemoCell<SeriesGroups>,
}

impl PloneSeriesResolver {
    pub fn new(index: PloneDistIndex) -> Self {
        Self {
            index,
            listing: MemoCell::new(),
        }
    }

    /// Returns every offered series with its releases sorted ascending.
    pub async fn fetch_series(&self) -> Outcome<SeriesGroups> {
        if let Some(groups) = self.listing.get() {
            debug!("Serving Plone series listing from cache");
            return Outcome::Live(groups);
        }

        match self.try_fetch().await {
            Ok(groups) => {
                self.listing.set(groups.clone());
                Outcome::Live(groups)
            }
            Err(err) => {
                warn!("Plone release index unavailable, using fallback: {}", err);
                Outcome::Fallback(fallback_groups())
            }
        }
    }

    /// Returns the newest release per series, newest series first.
    pub async fn latest(&self) -> Outcome<Vec<SeriesLatest>> {
        self.fetch_series()
            .await
            .map(|groups| latest_per_series(&groups))
    }

    /// Drops the memoized listing so the next call fetches fresh data.
    pub fn invalidate(&self) {
        debug!("Clearing memoized Plone series listing");
        self.listing.clear();
    }

    async fn try_fetch(&self) -> Result<SeriesGroups, RegistryError> {
        let versions = self.index.fetch_versions().await?;

        let mut groups = SeriesGroups::new();
        for version in versions {
            let mut parts = version.split('.');
            let Some(major) = parts.next().and_then(|p| p.parse::<u64>().ok()) else {
                continue;
            };
            if major < MIN_PLONE_MAJOR {
                continue;
            }
            let Some(minor) = parts.next().and_then(|p| p.parse::<u64>().ok()) else {
                continue;
            };
            groups.push(SeriesKey::minor(major, minor), version);
        }
        groups.sort_groups();

        Ok(groups)
    }
}

fn fallback_groups() -> SeriesGroups {
    let (major, minor) = PLONE_FALLBACK_SERIES;
    let series = SeriesKey::minor(major, minor);

    let mut groups = SeriesGroups::new();
    groups.push(series.clone(), series.to_string());
    groups
}

fn latest_per_series(groups: &SeriesGroups) -> Vec<SeriesLatest> {
    groups
        .iter_desc()
        .filter_map(|(series, versions)| {
            versions.last().map(|version| SeriesLatest {
                series: series.clone(),
                version: version.clone(),
            })
        })
        .collect()
}
