//! Function schemas and signature scanning
//!
//! This module describes callables explicitly and walks their parameters
//! into resolved slots.

pub mod extend;
pub mod function;
pub mod options;
pub mod scan;

// Re-export main types
pub use extend::*;
pub use function::*;
pub use options::*;
pub use scan::*;
