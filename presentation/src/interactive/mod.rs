//! Interactive search module
//!
//! Provides a reedline-based prompt where repeated queries are served from
//! the result cache.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::SearchRepl;
