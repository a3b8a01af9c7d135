//! Documentation parsing and reconciliation
//!
//! This module reads parameter sections out of documentation text,
//! cross-validates them against the scanned signature and rewrites them when
//! parameters are added.

pub mod docstring;
pub mod reconcile;
pub mod render;

// Re-export main types
pub use docstring::*;
pub use reconcile::*;
pub use render::*;
