//! Flag emission
//!
//! Turns reconciled [`ArgumentRecord`]s into [`FlagSpec`]s, an ordered list of
//! flag definitions handed to clap in one go by [`register`]. Defaults are not
//! given to clap; [`FlagSpec::extract`] applies them when reading values back
//! so that parsed values keep their original type.

use crate::docs::ArgumentRecord;
use crate::error::{Result, SchemaError, SchemaResult};
use crate::types::{Kind, Multiplicity, ScalarKind, StreamArg, Value};
use clap::builder::PossibleValuesParser;
use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashSet;
use tracing::debug;

/// Prefix of the flag that switches off a boolean defaulting to true
pub const NEGATION_PREFIX: &str = "NOT_";

/// How a flag turns command line tokens into a value
#[derive(Debug, Clone, PartialEq)]
pub enum FlagAction {
    /// Takes one value, or one-or-more for sequences
    Store {
        kind: ScalarKind,
        multiplicity: Multiplicity,
    },
    /// Takes one value out of a fixed set of literals
    Choice { values: Vec<Value> },
    /// Takes no value; presence stores `when_present`
    Toggle { when_present: bool },
}

/// One flag definition
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    /// Parameter name, also the clap argument id
    pub dest: String,
    /// Long flag name without the leading dashes
    pub long: String,
    pub action: FlagAction,
    pub required: bool,
    pub default: Option<Value>,
    pub help: String,
}

impl FlagSpec {
    /// A single-valued option flag, not required, without default
    pub fn option(name: impl Into<String>, kind: ScalarKind) -> Self {
        let name = name.into();
        FlagSpec {
            long: name.clone(),
            dest: name,
            action: FlagAction::Store {
                kind,
                multiplicity: Multiplicity::Single,
            },
            required: false,
            default: None,
            help: String::new(),
        }
    }

    /// A boolean toggle named after the default it flips
    pub fn toggle(name: impl Into<String>, default: bool) -> Self {
        let name = name.into();
        let long = if default {
            format!("{}{}", NEGATION_PREFIX, name)
        } else {
            name.clone()
        };
        FlagSpec {
            dest: name,
            long,
            action: FlagAction::Toggle {
                when_present: !default,
            },
            required: false,
            default: Some(Value::Bool(default)),
            help: String::new(),
        }
    }

    /// Accept one-or-more values
    pub fn sequence(mut self) -> Self {
        if let FlagAction::Store { multiplicity, .. } = &mut self.action {
            *multiplicity = Multiplicity::Sequence;
        }
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into()).filter(|d| !d.is_none());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self.action, FlagAction::Toggle { .. })
    }

    /// Build the clap argument, optionally under a help heading
    pub fn to_arg(&self, heading: Option<&str>) -> Arg {
        // a repeated flag replaces its earlier occurrence
        let mut arg = Arg::new(self.dest.clone())
            .long(self.long.clone())
            .help(self.help.clone())
            .required(self.required)
            .overrides_with(self.dest.clone());
        if let Some(heading) = heading {
            arg = arg.help_heading(heading.to_string());
        }

        match &self.action {
            FlagAction::Toggle { when_present: true } => arg.action(ArgAction::SetTrue),
            FlagAction::Toggle {
                when_present: false,
            } => arg.action(ArgAction::SetFalse),
            FlagAction::Choice { values } => {
                let names: Vec<String> = values.iter().map(Value::to_string).collect();
                arg.value_name(self.dest.to_uppercase())
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true)
                    .value_parser(PossibleValuesParser::new(names))
            }
            FlagAction::Store { kind, multiplicity } => {
                // values such as `-1` are never read as flags
                arg = arg
                    .value_name(self.dest.to_uppercase())
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true)
                    .value_parser(kind.value_parser());
                match multiplicity {
                    Multiplicity::Single => arg,
                    Multiplicity::Sequence => arg.num_args(1..),
                }
            }
        }
    }

    /// Read this flag's value back, falling back to the default and then `None`
    pub fn extract(&self, matches: &ArgMatches) -> Result<Value> {
        let parsed = match &self.action {
            FlagAction::Toggle { .. } => one::<bool>(matches, &self.dest)?.map(Value::Bool),
            FlagAction::Choice { values } => one::<String>(matches, &self.dest)?
                .and_then(|raw| values.iter().find(|v| v.to_string() == raw).cloned()),
            FlagAction::Store {
                kind,
                multiplicity: Multiplicity::Single,
            } => read_one(matches, &self.dest, *kind)?,
            FlagAction::Store {
                kind,
                multiplicity: Multiplicity::Sequence,
            } => read_many(matches, &self.dest, *kind)?.map(Value::List),
        };

        Ok(parsed
            .or_else(|| self.default.clone())
            .unwrap_or(Value::None))
    }
}

fn one<T>(matches: &ArgMatches, id: &str) -> std::result::Result<Option<T>, MatchesError>
where
    T: Clone + Send + Sync + 'static,
{
    Ok(matches.try_get_one::<T>(id)?.cloned())
}

fn many<T>(matches: &ArgMatches, id: &str) -> std::result::Result<Option<Vec<T>>, MatchesError>
where
    T: Clone + Send + Sync + 'static,
{
    Ok(matches.try_get_many::<T>(id)?.map(|values| values.cloned().collect()))
}

fn read_one(matches: &ArgMatches, id: &str, kind: ScalarKind) -> Result<Option<Value>> {
    let value = match kind {
        ScalarKind::String => one::<String>(matches, id)?.map(Value::Str),
        ScalarKind::Float => one::<f64>(matches, id)?.map(Value::Float),
        ScalarKind::Integer => one::<i64>(matches, id)?.map(Value::Int),
        ScalarKind::Boolean => one::<bool>(matches, id)?.map(Value::Bool),
        ScalarKind::TextStream | ScalarKind::BinaryStream => {
            one::<StreamArg>(matches, id)?.map(Value::Stream)
        }
    };
    Ok(value)
}

fn read_many(matches: &ArgMatches, id: &str, kind: ScalarKind) -> Result<Option<Vec<Value>>> {
    let values = match kind {
        ScalarKind::String => many::<String>(matches, id)?.map(|v| v.into_iter().map(Value::Str).collect()),
        ScalarKind::Float => many::<f64>(matches, id)?.map(|v| v.into_iter().map(Value::Float).collect()),
        ScalarKind::Integer => many::<i64>(matches, id)?.map(|v| v.into_iter().map(Value::Int).collect()),
        ScalarKind::Boolean => many::<bool>(matches, id)?.map(|v| v.into_iter().map(Value::Bool).collect()),
        ScalarKind::TextStream | ScalarKind::BinaryStream => {
            many::<StreamArg>(matches, id)?.map(|v| v.into_iter().map(Value::Stream).collect())
        }
    };
    Ok(values)
}

/// Turn reconciled records into flag definitions
pub fn emit(records: &[ArgumentRecord], optional: &HashSet<String>) -> SchemaResult<Vec<FlagSpec>> {
    records.iter().map(|record| emit_one(record, optional)).collect()
}

fn emit_one(record: &ArgumentRecord, optional: &HashSet<String>) -> SchemaResult<FlagSpec> {
    let descriptor = &record.descriptor;

    // a sequence of booleans takes `true`/`false` tokens instead of toggling
    if descriptor.is_boolean() && !descriptor.is_sequence() {
        let Some(Value::Bool(default)) = record.default else {
            return Err(SchemaError::InvalidBooleanDefault(record.name.clone()));
        };
        let action = if default { "store_false" } else { "store_true" };
        let help = format!(
            "{} Action: {} for variable {}",
            record.description, action, record.name
        );
        return Ok(FlagSpec::toggle(record.name.clone(), default).help(help));
    }

    let action = match &descriptor.kind {
        Kind::Choice(values) => FlagAction::Choice {
            values: values.clone(),
        },
        Kind::Scalar(kind) => FlagAction::Store {
            kind: *kind,
            multiplicity: descriptor.multiplicity,
        },
    };
    let help = format!(
        "{} Default={}",
        record.description,
        record.default.as_ref().unwrap_or(&Value::None)
    );

    Ok(FlagSpec {
        dest: record.name.clone(),
        long: record.name.clone(),
        action,
        required: record.is_required(optional),
        default: record.default.clone(),
        help,
    })
}

/// Append flags to a command, under `heading` when given
pub fn register(command: Command, flags: &[FlagSpec], heading: Option<&str>) -> Command {
    flags.iter().fold(command, |command, flag| {
        debug!(flag = %flag.long, required = flag.required, heading, "registering flag");
        command.arg(flag.to_arg(heading))
    })
}
