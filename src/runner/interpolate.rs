//! Variable interpolation for strings
//!
//! This module replaces variables in `run` templates using the ${var} syntax.

use crate::error::{InterpolationError, InterpolationResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::sync::LazyLock;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from the parsed arguments
/// - Environment variables (when not found in the arguments)
///
/// Substituted values are not interpolated again. Unknown names are left as-is.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let result = VARIABLE.replace_all(s, |caps: &Captures| {
        let name = &caps[1];
        vars.get(name)
            .cloned()
            .or_else(|| env::var(name).ok())
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(result.into_owned())
}

/// Interpolate with strict mode - errors on undefined variables
pub fn interpolate_strict(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    if let Some(caps) = VARIABLE
        .captures_iter(s)
        .find(|caps| !vars.contains_key(&caps[1]) && env::var(&caps[1]).is_err())
    {
        return Err(InterpolationError::UndefinedVariable(caps[1].to_string()));
    }
    interpolate(s, vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_interpolation() {
        let result = interpolate("Hello, ${name}!", &vars(&[("name", "world")])).unwrap();
        assert_eq!(result, "Hello, world!");
    }

    #[test]
    fn test_repeated_variable() {
        let result = interpolate("${a} + ${a}", &vars(&[("a", "1")])).unwrap();
        assert_eq!(result, "1 + 1");
    }

    #[test]
    fn test_environment_variable() {
        env::set_var("TEST_VAR_ARGDOC", "test_value");
        let result = interpolate("Value: ${TEST_VAR_ARGDOC}", &HashMap::new()).unwrap();
        assert_eq!(result, "Value: test_value");
        env::remove_var("TEST_VAR_ARGDOC");
    }

    #[test]
    fn test_arguments_shadow_environment() {
        env::set_var("TEST_SHADOW_ARGDOC", "env");
        let result = interpolate("${TEST_SHADOW_ARGDOC}", &vars(&[("TEST_SHADOW_ARGDOC", "arg")])).unwrap();
        assert_eq!(result, "arg");
        env::remove_var("TEST_SHADOW_ARGDOC");
    }

    #[test]
    fn test_values_are_not_reinterpolated() {
        let result = interpolate("${a}", &vars(&[("a", "${b}"), ("b", "x")])).unwrap();
        assert_eq!(result, "${b}");
    }

    #[test]
    fn test_undefined_variable_lenient() {
        let result = interpolate("Hello, ${undefined}!", &HashMap::new()).unwrap();
        assert_eq!(result, "Hello, ${undefined}!");
    }

    #[test]
    fn test_undefined_variable_strict() {
        let result = interpolate_strict("Hello, ${undefined}!", &HashMap::new());
        assert!(matches!(result, Err(InterpolationError::UndefinedVariable(name)) if name == "undefined"));
    }

    #[test]
    fn test_empty_variable_name() {
        let result = interpolate("Value: ${}", &HashMap::new()).unwrap();
        assert_eq!(result, "Value: ${}");
    }
}
