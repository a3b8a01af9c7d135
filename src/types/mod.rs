//! Type annotations, runtime values and annotation resolution
//!
//! This module maps declared parameter types onto the closed set of argument
//! kinds a command line can carry.

pub mod annotation;
pub mod resolve;
pub mod value;

// Re-export main types
pub use annotation::*;
pub use resolve::*;
pub use value::*;
