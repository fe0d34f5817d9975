//! Output formatting for search results

pub mod console;
