//! Function execution engine
//!
//! This module binds parsed arguments to variables and runs a function's
//! commands through the configured interpreter.

pub mod command;
pub mod context;
pub mod function;
pub mod interpolate;

// Re-export main types
pub use command::*;
pub use context::*;
pub use function::*;
pub use interpolate::*;
