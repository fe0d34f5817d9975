//! Progress reporting while sources are searched

pub mod reporter;
