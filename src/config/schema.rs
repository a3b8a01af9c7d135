//! Manifest validation
//!
//! A manifest is valid when every function builds a parser and every `run`
//! template only references that function's parameters (or the environment).

use crate::config::types::{FunctionConfig, Manifest};
use crate::error::{ConfigError, Result};
use crate::parser::build_flags;
use crate::runner::interpolate_strict;
use std::collections::HashMap;

/// Validate a complete manifest
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    if manifest.interpreter.as_ref().is_some_and(|i| i.is_empty()) {
        return Err(ConfigError::Invalid("interpreter must not be empty".to_string()).into());
    }

    for (name, function) in &manifest.functions {
        validate_function(name, function)?;
    }

    Ok(())
}

/// Validate a single function
pub fn validate_function(name: &str, config: &FunctionConfig) -> Result<()> {
    let function = config.to_function(name)?;
    let flags = build_flags(&function, &config.build_options())?;

    // only parameters that become flags are set at run time
    let vars: HashMap<String, String> = flags
        .iter()
        .map(|flag| (flag.dest.clone(), String::new()))
        .collect();

    for command in &config.run {
        interpolate_strict(command, &vars).map_err(|e| {
            ConfigError::Invalid(format!("function '{}': {}", name, e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_manifest;
    use crate::error::{ArgDocError, SchemaError};

    #[test]
    fn test_validate_valid_manifest() {
        let manifest = parse_manifest(
            r#"
functions:
  add:
    doc: |
      Add numbers
      :param a: first
      :param b: second
    params:
      - { name: a, type: int }
      - { name: b, type: int, default: 2 }
    run: echo $((${a} + ${b}))
"#,
        )
        .unwrap();
        assert!(validate_manifest(&manifest).is_ok());
    }

    #[test]
    fn test_validate_undefined_variable() {
        let manifest = parse_manifest(
            r#"
functions:
  greet:
    doc: ":param name: who"
    params:
      - { name: name, type: str }
    run: echo ${nmae}
"#,
        )
        .unwrap();
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(matches!(err, ArgDocError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().contains("nmae"));
    }

    #[test]
    fn test_validate_rejects_ignored_variable() {
        let manifest = parse_manifest(
            r#"
functions:
  pick:
    doc: |
      :param a: kept
      :param c: left out
    params:
      - { name: a, type: int }
      - { name: c, type: int, default: 1 }
    ignore: [c]
    run: echo ${a} ${c}
"#,
        )
        .unwrap();
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(matches!(err, ArgDocError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().contains("Variable 'c' is not defined"));
    }

    #[test]
    fn test_validate_doc_mismatch() {
        let manifest = parse_manifest(
            r#"
functions:
  swap:
    doc: |
      :param b: second
      :param a: first
    params:
      - { name: a, type: int }
      - { name: b, type: int }
"#,
        )
        .unwrap();
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(matches!(err, ArgDocError::Schema(SchemaError::Mismatch { .. })));
    }

    #[test]
    fn test_validate_missing_doc() {
        let manifest = parse_manifest(
            r#"
functions:
  bare:
    params:
      - { name: a, type: int }
"#,
        )
        .unwrap();
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(matches!(
            err,
            ArgDocError::Schema(SchemaError::MissingDocumentation(_))
        ));
    }

    #[test]
    fn test_validate_empty_interpreter() {
        let manifest = parse_manifest("interpreter: []\n").unwrap();
        assert!(validate_manifest(&manifest).is_err());
    }
}
