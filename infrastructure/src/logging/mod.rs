//! Logging infrastructure: structured search logging.
//!
//! Provides [`JsonlSearchLogger`], a JSONL file writer that implements
//! the [`SearchLogger`](snaxel_application::SearchLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSearchLogger;
