//! argdoc - command line parsers from documented function signatures
//!
//! A function is described by its ordered, typed parameters and its
//! documentation text. argdoc cross-checks the two and emits a clap parser
//! whose flags mirror the parameters, and can generate the command line that
//! reproduces a given set of values. The `argdoc` binary drives this from an
//! `argdoc.yml` manifest.

// Public modules
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod generate;
pub mod parser;
pub mod runner;
pub mod signature;
pub mod types;

// Re-export commonly used types
pub use error::{ArgDocError, Result};
pub use generate::{generate_args, CommandLine};
pub use parser::{
    get_parser_from_function, parse_function_and_call, parse_function_and_call_from, AutoParser,
    FunctionParser, GroupedArguments,
};
pub use signature::{BuildOptions, Extension, Function, Parameter};
pub use types::{Arguments, Value};

/// Current version of argdoc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
