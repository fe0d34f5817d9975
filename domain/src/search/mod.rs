//! Search results: items, per-source outcomes, and the merged envelope.

pub mod envelope;
pub mod result_item;
pub mod source_result;
pub mod summary;

pub use envelope::Envelope;
pub use result_item::ResultItem;
pub use source_result::{FailureKind, FailureReason, SourceResult};
pub use summary::{SearchSummary, SourceSummary};
