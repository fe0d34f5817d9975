//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated, normalized search query
//! - [`source::Source`] / [`source::SourceSet`]: result categories being requested
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod query;
pub mod source;
