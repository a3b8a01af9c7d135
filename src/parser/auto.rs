//! Parsers built from documented functions
//!
//! [`FunctionParser`] covers the single-function case. [`AutoParser`] collects
//! the flags of several functions, optionally each under its own group, and
//! splits parsed values back per group.

use crate::docs::{reconcile, summary, DocParser, DocstringParser};
use crate::error::{Result, SchemaError, SchemaResult};
use crate::parser::{emit, register, FlagSpec};
use crate::signature::{scan, BuildOptions, Function};
use crate::types::{Arguments, Value};
use clap::{ArgMatches, Command};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::ffi::OsString;
use tracing::debug;

/// Flag names clap registers on its own
const RESERVED: &[&str] = &["help"];

/// Ids and long names already taken on one command
#[derive(Debug, Clone, Default)]
struct FlagNames {
    ids: HashSet<String>,
    longs: HashSet<String>,
}

impl FlagNames {
    fn claim(&mut self, flag: &FlagSpec) -> SchemaResult<()> {
        if RESERVED.contains(&flag.long.as_str()) || self.longs.contains(&flag.long) {
            return Err(SchemaError::DuplicateArgument(flag.long.clone()));
        }
        if RESERVED.contains(&flag.dest.as_str()) || self.ids.contains(&flag.dest) {
            return Err(SchemaError::DuplicateArgument(flag.dest.clone()));
        }
        self.longs.insert(flag.long.clone());
        self.ids.insert(flag.dest.clone());
        Ok(())
    }
}

/// Fail when two flags would share an id or a long name
pub fn check_unique(flags: &[FlagSpec]) -> SchemaResult<()> {
    let mut names = FlagNames::default();
    flags.iter().try_for_each(|flag| names.claim(flag))
}

/// Build the flag definitions of `function` with the default documentation parser
pub fn build_flags(function: &Function, opts: &BuildOptions) -> Result<Vec<FlagSpec>> {
    build_flags_with(function, opts, &DocstringParser::auto())
}

/// Build the flag definitions of `function` with a custom documentation parser
pub fn build_flags_with(
    function: &Function,
    opts: &BuildOptions,
    docs: &impl DocParser,
) -> Result<Vec<FlagSpec>> {
    let doc = function
        .doc_text()
        .ok_or_else(|| SchemaError::MissingDocumentation(function.name().to_string()))?;

    let scanned = scan(function, opts)?;
    let doc_params = docs.parse_params(doc);
    let records = reconcile(function.name(), &scanned, &doc_params, opts)?;
    let flags = emit(&records, &opts.optional)?;
    check_unique(&flags)?;

    debug!(function = function.name(), flags = flags.len(), "built flags");
    Ok(flags)
}

/// A clap command holding the flags of one function
#[derive(Debug, Clone)]
pub struct FunctionParser {
    command: Command,
    flags: Vec<FlagSpec>,
}

impl FunctionParser {
    pub fn new(function: &Function, opts: &BuildOptions) -> Result<Self> {
        let flags = build_flags(function, opts)?;
        let mut command = Command::new(function.name().to_string());
        if let Some(about) = function.doc_text().and_then(summary) {
            command = command.about(about);
        }
        Self::from_flags(command, flags)
    }

    /// Register `flags` on an existing command
    pub fn from_flags(command: Command, flags: Vec<FlagSpec>) -> Result<Self> {
        check_unique(&flags)?;
        let command = register(command, &flags, None);
        Ok(FunctionParser { command, flags })
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn into_command(self) -> Command {
        self.command
    }

    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Parse `argv`, whose first item is the program name
    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<Arguments>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(argv)?;
        self.extract(&matches)
    }

    /// Parse the process arguments; usage errors exit the process
    pub fn parse(&self) -> Result<Arguments> {
        let matches = self.command.clone().get_matches();
        self.extract(&matches)
    }

    /// Read every flag's value out of already-parsed matches
    pub fn extract(&self, matches: &ArgMatches) -> Result<Arguments> {
        self.flags
            .iter()
            .map(|flag| -> Result<(String, Value)> { Ok((flag.dest.clone(), flag.extract(matches)?)) })
            .collect()
    }
}

/// Build a parser for a single function
pub fn get_parser_from_function(function: &Function, opts: &BuildOptions) -> Result<FunctionParser> {
    FunctionParser::new(function, opts)
}

/// Parse the process arguments for `function` and hand them to `call`
pub fn parse_function_and_call<F, R>(function: &Function, opts: &BuildOptions, call: F) -> Result<R>
where
    F: FnOnce(Arguments) -> R,
{
    let args = get_parser_from_function(function, opts)?.parse()?;
    Ok(call(args))
}

/// Like [`parse_function_and_call`], with explicit `argv`
pub fn parse_function_and_call_from<I, T, F, R>(
    function: &Function,
    opts: &BuildOptions,
    argv: I,
    call: F,
) -> Result<R>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(Arguments) -> R,
{
    let args = get_parser_from_function(function, opts)?.try_parse_from(argv)?;
    Ok(call(args))
}

/// Parsed values split by the group their flag was registered under
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedArguments {
    groups: IndexMap<String, Arguments>,
    ungrouped: Arguments,
}

impl GroupedArguments {
    pub fn group(&self, title: &str) -> Option<&Arguments> {
        self.groups.get(title)
    }

    /// Values of flags added without a group
    pub fn ungrouped(&self) -> &Arguments {
        &self.ungrouped
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

/// A command accumulating flags from several functions
#[derive(Debug, Clone)]
pub struct AutoParser {
    command: Command,
    flags: Vec<(Option<String>, FlagSpec)>,
    names: FlagNames,
}

impl AutoParser {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_command(Command::new(name.into()))
    }

    /// Start from a pre-configured command (about, version, ...)
    pub fn with_command(command: Command) -> Self {
        AutoParser {
            command,
            flags: Vec::new(),
            names: FlagNames::default(),
        }
    }

    /// Add the flags of `function`, under `group` when given
    pub fn add_function(mut self, function: &Function, group: Option<&str>, opts: &BuildOptions) -> Result<Self> {
        for flag in build_flags(function, opts)? {
            self = self.add_flag(flag, group)?;
        }
        Ok(self)
    }

    /// Add a single flag, under `group` when given
    pub fn add_flag(mut self, flag: FlagSpec, group: Option<&str>) -> Result<Self> {
        self.names.claim(&flag)?;
        self.flags.push((group.map(str::to_string), flag));
        Ok(self)
    }

    fn build_command(&self) -> Command {
        self.flags
            .iter()
            .fold(self.command.clone(), |command, (group, flag)| {
                register(command, std::slice::from_ref(flag), group.as_deref())
            })
    }

    pub fn command(&self) -> Command {
        self.build_command()
    }

    pub fn render_help(&self) -> String {
        self.build_command().render_help().to_string()
    }

    /// Parse `argv` into one flat set of values
    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<Arguments>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build_command().try_get_matches_from(argv)?;
        self.flags
            .iter()
            .map(|(_, flag)| -> Result<(String, Value)> { Ok((flag.dest.clone(), flag.extract(&matches)?)) })
            .collect()
    }

    /// Parse `argv` and split values per group
    pub fn try_parse_groups_from<I, T>(&self, argv: I) -> Result<GroupedArguments>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build_command().try_get_matches_from(argv)?;
        self.split(&matches)
    }

    /// Parse the process arguments and split values per group; usage errors exit
    pub fn parse_groups(&self) -> Result<GroupedArguments> {
        let matches = self.build_command().get_matches();
        self.split(&matches)
    }

    fn split(&self, matches: &ArgMatches) -> Result<GroupedArguments> {
        let mut grouped = GroupedArguments::default();
        for (group, flag) in &self.flags {
            let value = flag.extract(matches)?;
            match group {
                Some(title) => grouped
                    .groups
                    .entry(title.clone())
                    .or_default()
                    .insert(flag.dest.clone(), value),
                None => grouped.ungrouped.insert(flag.dest.clone(), value),
            }
        }
        Ok(grouped)
    }
}
