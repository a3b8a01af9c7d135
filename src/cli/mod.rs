//! CLI interface
//!
//! This module builds the `argdoc` command from a manifest, one subcommand
//! per function, and handles shell completion.

pub mod app;

// Re-export main types
pub use app::*;
