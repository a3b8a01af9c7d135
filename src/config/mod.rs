//! Manifest parsing and validation
//!
//! This module handles parsing of argdoc.yml manifests, which declare
//! documented functions and the commands they run.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
