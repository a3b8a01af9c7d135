//! CLI parser construction
//!
//! This module emits flag definitions from reconciled parameters and wraps
//! them into clap commands.

pub mod auto;
pub mod emit;

// Re-export main types
pub use auto::*;
pub use emit::*;
