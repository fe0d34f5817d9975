//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    InvalidQuery,

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}
