//! Main CLI application

use crate::config::{parse_manifest_auto, parse_manifest_file, validate_manifest, Manifest};
use crate::error::{ArgDocError, ConfigError};
use crate::runner::{Context, FunctionRunner, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use indexmap::IndexMap;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed manifest
    manifest: Manifest,
    /// Manifest file path
    manifest_path: PathBuf,
    /// Runnable functions by name
    runners: IndexMap<String, FunctionRunner>,
}

impl App {
    /// Create a new app by discovering the manifest
    pub fn new() -> Result<Self, ArgDocError> {
        let (manifest, manifest_path) = parse_manifest_auto()?;
        Self::from_manifest(manifest, manifest_path)
    }

    /// Create app with a specific manifest file
    pub fn with_manifest_file(path: PathBuf) -> Result<Self, ArgDocError> {
        let manifest = parse_manifest_file(&path)?;
        Self::from_manifest(manifest, path)
    }

    /// Create app from an already parsed manifest
    pub fn from_manifest(manifest: Manifest, manifest_path: PathBuf) -> Result<Self, ArgDocError> {
        validate_manifest(&manifest)?;

        let runners = manifest
            .functions
            .iter()
            .map(|(name, config)| -> Result<(String, FunctionRunner), ArgDocError> {
                Ok((name.clone(), FunctionRunner::from_config(name, config)?))
            })
            .collect::<Result<IndexMap<_, _>, ArgDocError>>()?;
        let command = build_command(&manifest, &runners);

        Ok(App {
            command,
            manifest,
            manifest_path,
            runners,
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Run the application with process arguments
    pub fn run(self) -> Result<(), ArgDocError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with explicit arguments
    pub fn run_from<I, T>(mut self, argv: I) -> Result<(), ArgDocError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(argv)?;

        let verbosity = get_verbosity(&matches);
        init_logging(verbosity);

        if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
            let name = self.command.get_name().to_string();
            clap_complete::generate(shell, &mut self.command, name, &mut io::stdout());
            return Ok(());
        }

        // Check if a function was specified
        let (name, sub_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                // No function specified, show help
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        let runner = self
            .runners
            .get(&name)
            .ok_or_else(|| ConfigError::FunctionNotFound(name.clone()))?;
        let args = runner.arguments(sub_matches)?;
        debug!(function = %name, manifest = %self.manifest_path.display(), "running function");

        let mut ctx = Context::new()
            .with_verbosity(verbosity)
            .with_dry_run(matches.get_flag("dry_run"));
        if let Some(dir) = self.manifest_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            ctx = ctx.with_working_dir(dir.to_path_buf());
        }
        if let Some(interpreter) = &self.manifest.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        runner.execute(&args, ctx)
    }
}

/// Build the clap command from the manifest
fn build_command(manifest: &Manifest, runners: &IndexMap<String, FunctionRunner>) -> Command {
    let mut cmd = Command::new(manifest.name.clone().unwrap_or_else(|| "argdoc".to_string()))
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            manifest
                .usage
                .clone()
                .unwrap_or_else(|| "Command line flags from documented functions".to_string()),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to argdoc.yml manifest"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .help("Print commands without running them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script")
                .value_parser(clap::value_parser!(Shell)),
        );

    // Add a subcommand for each public function
    for runner in runners.values() {
        if runner.is_private() {
            continue;
        }
        cmd = cmd.subcommand(runner.subcommand());
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the verbosity flags
fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .try_init();
}

/// Run the CLI application with process arguments
pub fn run() -> Result<(), ArgDocError> {
    let args: Vec<String> = std::env::args().collect();

    let app = match extract_file_arg(&args) {
        Some(path) => App::with_manifest_file(path)?,
        None => App::new()?,
    };

    app.run_from(args)
}

/// Extract --file before clap parsing; only flags before the function name count
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--file" || arg == "-f" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        if arg == "--completions" {
            iter.next();
            continue;
        }
        if !arg.starts_with('-') {
            break;
        }
    }
    None
}
