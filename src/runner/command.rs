//! Command execution
//!
//! This module handles executing a function's `run` commands.

use crate::error::{ExecutionError, Result};
use crate::runner::{interpolate_strict, Context};
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

/// Execute a command template in the given context
pub fn execute_command(template: &str, ctx: &Context) -> Result<()> {
    let exec_str = interpolate_strict(template, &ctx.vars)?;
    ctx.print_run(&exec_str);
    if ctx.dry_run {
        return Ok(());
    }

    let (program, interpreter_args) = ctx
        .interpreter
        .split_first()
        .ok_or(ExecutionError::EmptyInterpreter)?;

    let mut command = StdCommand::new(program);
    command
        .args(interpreter_args)
        .arg(&exec_str)
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Arguments are also visible as environment variables
    for (key, value) in &ctx.vars {
        command.env(key, value);
    }

    debug!(program = %program, command = %exec_str, "spawning");
    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: program.clone(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed(status.code()).into());
    }

    Ok(())
}

/// Execute each command in order, stopping at the first failure
pub fn execute_all(commands: &[String], ctx: &Context) -> Result<()> {
    for command in commands {
        execute_command(command, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArgDocError;
    use crate::runner::Verbosity;
    use std::collections::HashMap;

    fn quiet() -> Context {
        Context::new().with_verbosity(Verbosity::Quiet)
    }

    #[test]
    fn test_execute_simple_command() {
        assert!(execute_command("echo test", &quiet()).is_ok());
    }

    #[test]
    fn test_execute_command_with_variables() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "world".to_string());
        let ctx = quiet().with_vars(vars);
        assert!(execute_command("test \"${name}\" = world", &ctx).is_ok());
        assert!(execute_command("test \"$name\" = world", &ctx).is_ok());
    }

    #[test]
    fn test_execute_failing_command() {
        let result = execute_command("exit 3", &quiet());
        assert!(matches!(
            result,
            Err(ArgDocError::Execution(ExecutionError::CommandFailed(Some(3))))
        ));
    }

    #[test]
    fn test_execute_undefined_variable() {
        let result = execute_command("echo ${missing_argdoc_var}", &quiet());
        assert!(matches!(result, Err(ArgDocError::Interpolation(_))));
    }

    #[test]
    fn test_dry_run_does_not_spawn() {
        let ctx = quiet().with_dry_run(true).with_interpreter(vec![]);
        assert!(execute_command("false", &ctx).is_ok());
    }

    #[test]
    fn test_empty_interpreter() {
        let ctx = quiet().with_interpreter(vec![]);
        let result = execute_command("true", &ctx);
        assert!(matches!(
            result,
            Err(ArgDocError::Execution(ExecutionError::EmptyInterpreter))
        ));
    }

    #[test]
    fn test_execute_all_stops_at_failure() {
        let commands = vec!["true".to_string(), "false".to_string(), "exit 5".to_string()];
        let result = execute_all(&commands, &quiet());
        assert!(matches!(
            result,
            Err(ArgDocError::Execution(ExecutionError::CommandFailed(Some(1))))
        ));
    }
}
