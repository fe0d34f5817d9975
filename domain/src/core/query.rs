//! Query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A validated search query (Value Object)
///
/// Holds the trimmed text the user typed. Identity (equality, cache keys)
/// is driven by the case-folded form returned by [`Query::normalized`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    text: String,
    normalized: String,
}

impl Query {
    /// Parse raw user input into a query.
    ///
    /// Fails with [`DomainError::InvalidQuery`] when the input is empty or
    /// whitespace only.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let text = raw.as_ref().trim();
        if text.is_empty() {
            return Err(DomainError::InvalidQuery);
        }
        Ok(Self {
            text: text.to_string(),
            normalized: text.to_lowercase(),
        })
    }

    /// Trimmed query text, as echoed back in responses
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Trimmed, lowercased form used for comparisons and cache keys
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for Query {}

impl std::hash::Hash for Query {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for Query {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Query::parse(value)
    }
}

impl TryFrom<&str> for Query {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Query::parse(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.text
    }
}
