//! Series grouping of published versions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::version::VersionKey;

/// Identifier of a release series: a bare major (`19`) or a major.minor
/// pair (`6.1`).
///
/// Ordering is numeric on (major, minor), so series `6.10` ranks above
/// `6.9` even though the labels compare the other way around as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeriesKey {
    major: u64,
    minor: Option<u64>,
}

impl SeriesKey {
    pub fn major(major: u64) -> Self {
        Self { major, minor: None }
    }

    pub fn minor(major: u64, minor: u64) -> Self {
        Self {
            major,
            minor: Some(minor),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

impl FromStr for SeriesKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let major = parts.next().ok_or(())?.parse().map_err(|_| ())?;
        let minor = match parts.next() {
            Some(part) => Some(part.parse().map_err(|_| ())?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(());
        }
        Ok(Self { major, minor })
    }
}

/// Published versions observed per series.
///
/// After [`sort_groups`](SeriesGroups::sort_groups) every group is ascending
/// by [`VersionKey`], so the newest entry of a group is its last element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesGroups {
    groups: BTreeMap<SeriesKey, Vec<String>>,
}

impl SeriesGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, series: SeriesKey, version: String) {
        self.groups.entry(series).or_default().push(version);
    }

    /// Sorts every group ascending. The sort is stable, so entries with
    /// equal keys keep the order in which the source published them.
    pub fn sort_groups(&mut self) {
        for versions in self.groups.values_mut() {
            versions.sort_by_cached_key(|v| VersionKey::parse(v));
        }
    }

    pub fn get(&self, series: &SeriesKey) -> Option<&[String]> {
        self.groups.get(series).map(Vec::as_slice)
    }

    /// Iterates groups from the newest series to the oldest.
    pub fn iter_desc(&self) -> impl Iterator<Item = (&SeriesKey, &[String])> {
        self.groups.iter().rev().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A series label paired with the version selected to represent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLatest {
    pub series: SeriesKey,
    pub version: String,
}
