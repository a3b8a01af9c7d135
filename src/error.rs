//! Error types for argdoc

use std::io;
use thiserror::Error;

/// Result type alias for argdoc operations
pub type Result<T> = std::result::Result<T, ArgDocError>;

/// Main error type for argdoc
#[derive(Error, Debug)]
pub enum ArgDocError {
    /// A type annotation could not be mapped to a CLI argument
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// Signature and documentation disagree
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A command line could not be generated from values
    #[error("Command generation error: {0}")]
    Generate(#[from] GenerateError),

    /// Manifest-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Usage errors reported by clap (missing flags, bad values, --help)
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// A parsed value could not be read back from clap
    #[error("Failed to read parsed value: {0}")]
    Matches(#[from] clap::parser::MatchesError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Annotation resolution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("Not supported type '{ty}' for parameter '{param}'")]
    Unsupported { ty: String, param: String },

    #[error("Only Optional[X] or Union[X, None] are supported, got '{ty}' for parameter '{param}'")]
    UnsupportedUnion { ty: String, param: String },

    #[error("Only simple aggregated types are supported, got '{ty}' for parameter '{param}'")]
    Aggregate { ty: String, param: String },

    #[error("Nested types are not supported, got '{ty}' for parameter '{param}'")]
    Nested { ty: String, param: String },

    #[error("Invalid annotation '{text}': {reason}")]
    InvalidAnnotation { text: String, reason: String },
}

/// Signature/documentation reconciliation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Mismatch between signature and documentation params in '{function}'\n{table}")]
    Mismatch { function: String, table: String },

    #[error("Duplicated argument '{0}'")]
    DuplicateArgument(String),

    #[error("Documentation missing for '{0}'")]
    MissingDocumentation(String),

    #[error("Bool arguments need to have an associated default value, '{0}' does not")]
    InvalidBooleanDefault(String),

    #[error("Type mismatch between documentation ({documented}) and signature ({signature}) for '{param}'")]
    DocTypeMismatch {
        param: String,
        documented: String,
        signature: String,
    },
}

/// Command string generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("Required argument '{0}' not provided")]
    MissingRequiredValue(String),

    #[error("Argument '{name}' should be {expected}")]
    InvalidValue { name: String, expected: String },
}

/// Manifest parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find manifest file (searched: {0})")]
    NotFound(String),

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Function '{0}' is not defined")]
    FunctionNotFound(String),

    #[error("Invalid default for parameter '{param}': {reason}")]
    InvalidDefault { param: String, reason: String },
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Interpreter is empty")]
    EmptyInterpreter,

    #[error("Failed to spawn '{program}': {error}")]
    Spawn { program: String, error: String },
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),
}

/// Specialized result type for annotation resolution
pub type TypeResult<T> = std::result::Result<T, TypeError>;

/// Specialized result type for reconciliation and emission
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Specialized result type for command generation
pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// Specialized result type for manifest operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Whether the error is a clap usage error that should be printed by clap itself
/// (help, version, missing or invalid flags)
pub fn is_usage_error(err: &ArgDocError) -> bool {
    matches!(err, ArgDocError::Cli(_))
}
