//! Command line generation
//!
//! The inverse of parsing: given a function and the values it should receive,
//! produce the tokens a parser built from that function accepts to reproduce
//! them.

use crate::error::{GenerateError, GenerateResult};
use crate::parser::NEGATION_PREFIX;
use crate::signature::{BuildOptions, Function, Parameter};
use crate::types::{resolve, Arguments, ParameterDescriptor, Value};
use tracing::{debug, warn};

/// Whether `param` may be left out of the value map
fn is_optional(param: &Parameter, descriptor: Option<&ParameterDescriptor>, opts: &BuildOptions) -> bool {
    param.default().is_some()
        || opts.is_forced_optional(param.name())
        || descriptor.is_some_and(|d| !d.required)
}

/// Generate the flag tokens reproducing `values` for `function`
///
/// Parameters whose annotation does not resolve are rendered as plain values.
pub fn generate_args(function: &Function, values: &Arguments, opts: &BuildOptions) -> GenerateResult<Vec<String>> {
    let mut argv = Vec::new();

    for param in function.params() {
        let name = param.name();
        if param.kind().is_structural() || opts.excludes(name) {
            continue;
        }

        let descriptor = resolve(name, param.annotation()).ok();
        let value = match values.get(name).filter(|v| !v.is_none()) {
            Some(value) => value,
            None if is_optional(param, descriptor.as_ref(), opts) => continue,
            None => return Err(GenerateError::MissingRequiredValue(name.to_string())),
        };

        let Some(descriptor) = descriptor else {
            argv.push(format!("--{}", name));
            argv.push(value.to_string());
            continue;
        };

        if descriptor.is_boolean() && !descriptor.is_sequence() {
            let default = param.default().and_then(Value::as_bool).unwrap_or(false);
            let value = value.as_bool().ok_or_else(|| GenerateError::InvalidValue {
                name: name.to_string(),
                expected: "a bool".to_string(),
            })?;
            if value != default {
                if default {
                    argv.push(format!("--{}{}", NEGATION_PREFIX, name));
                } else {
                    argv.push(format!("--{}", name));
                }
            }
            continue;
        }

        if descriptor.is_sequence() {
            let items = value.as_list().ok_or_else(|| GenerateError::InvalidValue {
                name: name.to_string(),
                expected: "a list".to_string(),
            })?;
            // an empty run of tokens is rejected by the parser
            if items.is_empty() {
                if is_optional(param, Some(&descriptor), opts) {
                    continue;
                }
                return Err(GenerateError::InvalidValue {
                    name: name.to_string(),
                    expected: "a non-empty list".to_string(),
                });
            }
            argv.push(format!("--{}", name));
            argv.extend(items.iter().map(element_token));
            continue;
        }

        argv.push(format!("--{}", name));
        argv.push(value.to_string());
    }

    for name in values.names() {
        if function.get_param(name).is_none() {
            warn!(function = function.name(), param = name, "ignoring value for unknown parameter");
        }
    }

    debug!(function = function.name(), ?argv, "generated arguments");
    Ok(argv)
}

/// Sequence elements as the scalar parsers read them
fn element_token(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// How the program is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Script(String),
    Module(String),
}

/// A full invocation: executable, target and generated flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    executable: String,
    target: Target,
}

impl CommandLine {
    /// `<exe> <path> <flags>`
    pub fn script(executable: impl Into<String>, path: impl Into<String>) -> Self {
        CommandLine {
            executable: executable.into(),
            target: Target::Script(path.into()),
        }
    }

    /// `<exe> -m <module> <flags>`
    pub fn module(executable: impl Into<String>, module: impl Into<String>) -> Self {
        CommandLine {
            executable: executable.into(),
            target: Target::Module(module.into()),
        }
    }

    /// Executable and target tokens, without flags
    pub fn prefix(&self) -> Vec<String> {
        match &self.target {
            Target::Script(path) => vec![self.executable.clone(), path.clone()],
            Target::Module(module) => vec![self.executable.clone(), "-m".to_string(), module.clone()],
        }
    }

    /// Render the full command string
    pub fn render(&self, function: &Function, values: &Arguments, opts: &BuildOptions) -> GenerateResult<String> {
        let mut tokens = self.prefix();
        tokens.extend(generate_args(function, values, opts)?);
        Ok(tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotation, StreamArg, StreamMode};

    fn function() -> Function {
        Function::new("fun")
            .param(Parameter::receiver("self"))
            .param(Parameter::of::<i64>("a"))
            .param(Parameter::of::<Vec<String>>("b").with_default(Value::List(vec![])))
            .param(Parameter::of::<bool>("c").with_default(true))
            .param(Parameter::of::<Option<f64>>("d"))
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_args() {
        let values = Arguments::new()
            .with("a", 5)
            .with("b", vec!["hello", "world"])
            .with("c", false)
            .with("d", 0.5);
        let argv = generate_args(&function(), &values, &BuildOptions::default()).unwrap();
        assert_eq!(
            argv,
            strings(&["--a", "5", "--b", "hello", "world", "--NOT_c", "--d", "0.5"])
        );
    }

    #[test]
    fn test_defaults_and_none_are_omitted() {
        let values = Arguments::new().with("a", 1).with("c", true).with("d", Value::None);
        let argv = generate_args(&function(), &values, &BuildOptions::default()).unwrap();
        assert_eq!(argv, strings(&["--a", "1"]));
    }

    #[test]
    fn test_missing_required() {
        let err = generate_args(&function(), &Arguments::new(), &BuildOptions::default()).unwrap_err();
        assert_eq!(err, GenerateError::MissingRequiredValue("a".to_string()));

        let argv = generate_args(
            &function(),
            &Arguments::new(),
            &BuildOptions::new().optional(["a"]),
        )
        .unwrap();
        assert!(argv.is_empty());

        let err = generate_args(&function(), &Arguments::new().with("a", Value::None), &BuildOptions::default())
            .unwrap_err();
        assert_eq!(err, GenerateError::MissingRequiredValue("a".to_string()));
    }

    #[test]
    fn test_sequence_needs_list() {
        let values = Arguments::new().with("a", 1).with("b", "hello");
        let err = generate_args(&function(), &values, &BuildOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Argument 'b' should be a list");
    }

    #[test]
    fn test_ignored_and_included() {
        let values = Arguments::new().with("a", 1).with("d", 2.0);
        let argv = generate_args(&function(), &values, &BuildOptions::new().ignore(["d"])).unwrap();
        assert_eq!(argv, strings(&["--a", "1"]));

        let argv = generate_args(&function(), &values, &BuildOptions::new().include(["d"])).unwrap();
        assert_eq!(argv, strings(&["--d", "2.0"]));
    }

    #[test]
    fn test_streams_and_unresolved_types() {
        let function = Function::new("f")
            .param(Parameter::of::<crate::types::TextStream>("input"))
            .param(Parameter::new("extra", Annotation::named("Any")));
        let values = Arguments::new()
            .with("input", StreamArg::new("data.txt", StreamMode::Text))
            .with("extra", "x");
        let argv = generate_args(&function, &values, &BuildOptions::default()).unwrap();
        assert_eq!(argv, strings(&["--input", "data.txt", "--extra", "x"]));
    }

    #[test]
    fn test_command_line() {
        let values = Arguments::new().with("a", 5).with("b", vec!["hello"]);
        let script = CommandLine::script("python", "script.py")
            .render(&function(), &values, &BuildOptions::default())
            .unwrap();
        assert_eq!(script, "python script.py --a 5 --b hello");

        let module = CommandLine::module("python", "pkg.script")
            .render(&function(), &Arguments::new().with("a", 5), &BuildOptions::default())
            .unwrap();
        assert_eq!(module, "python -m pkg.script --a 5");

        let bare = CommandLine::script("python", "script.py")
            .render(&Function::new("f"), &Arguments::new(), &BuildOptions::default())
            .unwrap();
        assert_eq!(bare, "python script.py");
    }
}
