//! Presentation layer for snaxel
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive search prompt.

pub mod cli;
pub mod interactive;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use interactive::SearchRepl;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
