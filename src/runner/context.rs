//! Execution context for running functions
//!
//! The context tracks the state needed while a function's commands run: the
//! interpreter, the variables rendered from parsed arguments and how chatty
//! to be about it.

use crate::types::{Arguments, Value};
use colored::Colorize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Execution context
pub struct Context {
    /// Directory commands run in
    pub working_dir: PathBuf,

    /// Variables rendered from parsed arguments
    pub vars: HashMap<String, String>,

    /// Interpreter prefix (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print commands instead of running them
    pub dry_run: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            vars: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            dry_run: false,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Render parsed arguments into variables
    pub fn with_arguments(mut self, args: &Arguments) -> Self {
        self.vars
            .extend(args.iter().map(|(name, value)| (name.to_string(), render_var(value))));
        self
    }

    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Print the command about to run
    pub fn print_run(&self, command: &str) {
        if self.dry_run || self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[RUN]".green().bold(), command);
        }
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("[INFO] {}", message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Shell-facing form of a value: lists space-joined, `true`/`false`, empty for `None`
pub fn render_var(value: &Value) -> String {
    match value {
        Value::None => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => items.iter().map(render_var).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}
