//! Manifest types
//!
//! This module defines the data structures that represent an argdoc.yml
//! manifest: documented functions, their parameters and the commands they run.

use crate::error::{ConfigError, ConfigResult, Result};
use crate::signature::{BuildOptions, Function, Parameter, ParameterKind};
use crate::types::{Annotation, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level manifest structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Functions, in the order they were written
    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,

    /// Interpreter to run commands with (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,
}

impl Manifest {
    pub fn function(&self, name: &str) -> ConfigResult<&FunctionConfig> {
        self.functions
            .get(name)
            .ok_or_else(|| ConfigError::FunctionNotFound(name.to_string()))
    }
}

/// A documented function
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionConfig {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Documentation text, parameters described in any supported style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Parameters in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamConfig>,

    /// Parameters left out of the parser
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// When set, only these parameters become flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Parameters never marked required
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,

    /// Check prose types in the documentation against declared types
    #[serde(default = "default_true")]
    pub check_doc_types: bool,

    /// Whether this function is hidden from the command line
    #[serde(default)]
    pub private: bool,

    /// Commands to execute
    #[serde(default, deserialize_with = "deserialize_run", skip_serializing_if = "Vec::is_empty")]
    pub run: Vec<String>,
}

impl FunctionConfig {
    /// Schema of this function
    pub fn to_function(&self, name: &str) -> Result<Function> {
        let mut function = Function::new(name);
        if let Some(doc) = &self.doc {
            function = function.doc(doc.clone());
        }
        for param in &self.params {
            function = function.param(param.to_parameter()?);
        }
        Ok(function)
    }

    /// Filters for parser construction and command generation
    pub fn build_options(&self) -> BuildOptions {
        let mut opts = BuildOptions::new()
            .ignore(self.ignore.iter().cloned())
            .optional(self.optional.iter().cloned())
            .check_doc_types(self.check_doc_types);
        if let Some(include) = &self.include {
            opts = opts.include(include.iter().cloned());
        }
        opts
    }
}

fn default_true() -> bool {
    true
}

/// One declared parameter
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParamConfig {
    /// Parameter name
    pub name: String,

    /// Type annotation, e.g. `int` or `Optional[List[str]]`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Default value; an explicit `null` is kept and differs from no default
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_yaml::Value>,

    /// Structural role
    #[serde(default)]
    pub kind: ParamKind,
}

impl ParamConfig {
    pub fn to_parameter(&self) -> Result<Parameter> {
        let annotation = match &self.type_name {
            Some(text) => text.parse::<Annotation>()?,
            None => Annotation::named("Any"),
        };
        let kind = match self.kind {
            ParamKind::Regular => ParameterKind::Regular,
            ParamKind::KeywordOnly => ParameterKind::KeywordOnly,
            ParamKind::Receiver => ParameterKind::Receiver,
            ParamKind::VarPositional => ParameterKind::VarPositional,
            ParamKind::VarKeyword => ParameterKind::VarKeyword,
        };

        let mut param = Parameter::new(self.name.clone(), annotation).with_kind(kind);
        if let Some(default) = &self.default {
            param = param.with_default(yaml_to_value(&self.name, default)?);
        }
        Ok(param)
    }
}

/// Structural role of a declared parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    Regular,
    KeywordOnly,
    Receiver,
    VarPositional,
    VarKeyword,
}

/// Convert a YAML default into a [`Value`]
pub fn yaml_to_value(param: &str, yaml: &serde_yaml::Value) -> ConfigResult<Value> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::None),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(ConfigError::InvalidDefault {
                    param: param.to_string(),
                    reason: format!("number {} is out of range", n),
                })
            }
        }
        Yaml::String(s) => Ok(Value::Str(s.clone())),
        Yaml::Sequence(items) => items
            .iter()
            .map(|item| yaml_to_value(param, item))
            .collect::<ConfigResult<Vec<Value>>>()
            .map(Value::List),
        Yaml::Mapping(_) | Yaml::Tagged(_) => Err(ConfigError::InvalidDefault {
            param: param.to_string(),
            reason: "mappings are not supported".to_string(),
        }),
    }
}

/// Keeps an explicit `null` as `Some(Null)`
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_yaml::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

/// Custom deserializer for run commands that handles both single values and arrays
fn deserialize_run<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value as Yaml;

    let value = Yaml::deserialize(deserializer)?;

    match value {
        // Single command
        Yaml::String(s) => Ok(vec![s]),
        // Array of commands
        Yaml::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Yaml::String(s) => Ok(s),
                _ => Err(D::Error::custom("run items must be strings")),
            })
            .collect(),
        // Null or not present
        Yaml::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string or array")),
    }
}
