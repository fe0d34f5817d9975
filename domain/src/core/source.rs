//! Source value objects
//!
//! A [`Source`] is one category of results served by an independent provider.
//! A [`SourceSet`] is the de-duplicated set of sources requested for a search.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A result category (Value Object)
///
/// Variant declaration order is the canonical presentation order, so the
/// derived `Ord` drives how sources are listed in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Web,
    Images,
    Videos,
    News,
    Books,
}

impl Source {
    /// Every known source, in canonical order
    pub const ALL: [Source; 5] = [
        Source::Web,
        Source::Images,
        Source::Videos,
        Source::News,
        Source::Books,
    ];

    /// Get the string identifier for this source
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Web => "web",
            Source::Images => "images",
            Source::Videos => "videos",
            Source::News => "news",
            Source::Books => "books",
        }
    }

    /// Parse an identifier, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for identifiers outside the known domain.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(id))
    }

    /// Factor applied to the requested result limit for this source.
    ///
    /// Image grids show twice as many tiles as the other result lists.
    pub fn limit_multiplier(&self) -> usize {
        match self {
            Source::Images => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::parse(s).ok_or_else(|| DomainError::UnknownSource(s.to_string()))
    }
}

/// A non-ordered set of requested sources (Value Object)
///
/// Equality is set equality; iteration always yields canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSet(BTreeSet<Source>);

impl SourceSet {
    /// The full source domain
    pub fn all() -> Self {
        Self(Source::ALL.into_iter().collect())
    }

    /// Build a set from caller-supplied identifiers.
    ///
    /// Unrecognized identifiers are dropped and returned alongside the set so
    /// callers can report them. The resulting set may be empty.
    pub fn from_identifiers<I, S>(ids: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        let mut ignored = Vec::new();
        for id in ids {
            match Source::parse(id.as_ref()) {
                Some(source) => {
                    set.insert(source);
                }
                None => ignored.push(id.as_ref().to_string()),
            }
        }
        (Self(set), ignored)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, source: Source) -> bool {
        self.0.contains(&source)
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Source> + '_ {
        self.0.iter().copied()
    }

    /// Sorted, comma-joined identifiers. Order-independent by construction.
    pub fn cache_fragment(&self) -> String {
        let mut ids: Vec<&str> = self.0.iter().map(Source::as_str).collect();
        ids.sort_unstable();
        ids.join(",")
    }
}

impl FromIterator<Source> for SourceSet {
    fn from_iter<T: IntoIterator<Item = Source>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.0.iter().map(Source::as_str).collect();
        write!(f, "{}", ids.join(", "))
    }
}
