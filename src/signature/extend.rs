//! Adding parameters to an existing function
//!
//! [`Function::with_extra_params`] builds a wider schema around a function:
//! new regular parameters go right after the required ones, new keyword-only
//! parameters after the existing keyword-only ones. The documentation is
//! rewritten so its parameter section matches the new order.

use crate::docs::{compose_doc, DocFrame};
use crate::error::{SchemaError, SchemaResult};
use crate::signature::{Function, Parameter, ParameterKind};
use crate::types::{Annotation, Arguments};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Parameters to add to a function, with their documentation
#[derive(Debug, Clone, Default)]
pub struct Extension {
    args: Vec<Parameter>,
    kwargs: Vec<Parameter>,
    descriptions: HashMap<String, String>,
    frame: DocFrame,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular parameter
    pub fn arg(mut self, param: Parameter, description: impl Into<String>) -> Self {
        self = self.describe(param.name().to_string(), description);
        self.args.push(param.with_kind(ParameterKind::Regular));
        self
    }

    /// Add a keyword-only parameter
    pub fn kwarg(mut self, param: Parameter, description: impl Into<String>) -> Self {
        self = self.describe(param.name().to_string(), description);
        self.kwargs.push(param.with_kind(ParameterKind::KeywordOnly));
        self
    }

    /// Set the description of any parameter, added or not
    pub fn describe(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.descriptions.insert(name.into(), description);
        }
        self
    }

    /// Text after the leading prose of the documentation
    pub fn prefix(mut self, text: impl Into<String>) -> Self {
        self.frame.prefix = Some(text.into());
        self
    }

    /// Text after the trailing prose of the documentation
    pub fn suffix(mut self, text: impl Into<String>) -> Self {
        self.frame.suffix = Some(text.into());
        self
    }

    /// Drop the existing leading prose, keeping only the prefix
    pub fn replace_prefix(mut self, replace: bool) -> Self {
        self.frame.replace_prefix = replace;
        self
    }

    /// Drop the existing trailing prose, keeping only the suffix
    pub fn replace_suffix(mut self, replace: bool) -> Self {
        self.frame.replace_suffix = replace;
        self
    }

    fn added(&self) -> impl Iterator<Item = &Parameter> {
        self.args.iter().chain(&self.kwargs)
    }
}

/// A function widened by an [`Extension`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedFunction {
    function: Function,
    added: Vec<String>,
}

impl ExtendedFunction {
    /// The widened schema, ready for parser building
    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn into_function(self) -> Function {
        self.function
    }

    /// Names of the added parameters
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.added.iter().map(String::as_str)
    }

    pub fn is_added(&self, name: &str) -> bool {
        self.added.iter().any(|a| a == name)
    }

    /// Split parsed values into the wrapped function's own and the added ones
    pub fn split(&self, args: &Arguments) -> (Arguments, Arguments) {
        let mut own = Arguments::new();
        let mut added = Arguments::new();
        for (name, value) in args.iter() {
            if self.is_added(name) {
                added.insert(name, value.clone());
            } else {
                own.insert(name, value.clone());
            }
        }
        (own, added)
    }
}

impl Function {
    /// Add the parameters of `extension` and rewrite the documentation to match
    pub fn with_extra_params(&self, extension: &Extension) -> SchemaResult<ExtendedFunction> {
        let mut names: HashSet<&str> = self.params().iter().map(Parameter::name).collect();
        for param in extension.added() {
            if !names.insert(param.name()) {
                return Err(SchemaError::DuplicateArgument(param.name().to_string()));
            }
        }

        let own = self.params();
        let params: Vec<Parameter> = select(own, |p| p.kind() == ParameterKind::Receiver)
            .chain(select(own, |p| p.kind() == ParameterKind::Regular && p.default().is_none()))
            .chain(extension.args.iter().cloned())
            .chain(select(own, |p| p.kind() == ParameterKind::Regular && p.default().is_some()))
            .chain(select(own, |p| p.kind() == ParameterKind::VarPositional))
            .chain(select(own, |p| p.kind() == ParameterKind::KeywordOnly))
            .chain(extension.kwargs.iter().cloned())
            .chain(select(own, |p| p.kind() == ParameterKind::VarKeyword))
            .collect();

        let documented: Vec<(&str, &Annotation)> = params
            .iter()
            .filter(|p| !p.kind().is_structural())
            .map(|p| (p.name(), p.annotation()))
            .collect();
        let doc = compose_doc(
            self.doc_text().unwrap_or_default(),
            &documented,
            &extension.descriptions,
            &extension.frame,
        );

        let added: Vec<String> = extension.added().map(|p| p.name().to_string()).collect();
        debug!(function = self.name(), added = ?added, "extended function");

        Ok(ExtendedFunction {
            function: Function::new(self.name()).doc(doc).params_from(params),
            added,
        })
    }
}

fn select<'a>(
    params: &'a [Parameter],
    keep: impl Fn(&Parameter) -> bool + 'a,
) -> impl Iterator<Item = Parameter> + 'a {
    params.iter().filter(move |p| keep(*p)).cloned()
}
