//! Runtime function representation
//!
//! A [`FunctionRunner`] is a manifest function with its parser already built,
//! ready to turn parsed flags into variables and run its commands.

use crate::config::FunctionConfig;
use crate::error::Result;
use crate::generate::generate_args;
use crate::parser::FunctionParser;
use crate::runner::{execute_all, Context};
use crate::signature::{BuildOptions, Function};
use crate::types::Arguments;
use clap::{ArgMatches, Command};

/// A manifest function ready to run
#[derive(Debug, Clone)]
pub struct FunctionRunner {
    name: String,
    usage: Option<String>,
    private: bool,
    function: Function,
    opts: BuildOptions,
    parser: FunctionParser,
    run: Vec<String>,
}

impl FunctionRunner {
    /// Build the schema and parser of function `name`
    pub fn from_config(name: &str, config: &FunctionConfig) -> Result<Self> {
        let function = config.to_function(name)?;
        let opts = config.build_options();
        let parser = FunctionParser::new(&function, &opts)?;

        Ok(FunctionRunner {
            name: name.to_string(),
            usage: config.usage.clone(),
            private: config.private,
            function,
            opts,
            parser,
            run: config.run.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn parser(&self) -> &FunctionParser {
        &self.parser
    }

    /// The subcommand exposing this function's flags
    pub fn subcommand(&self) -> Command {
        let command = self.parser.command().clone();
        match &self.usage {
            Some(usage) => command.about(usage.clone()),
            None => command,
        }
    }

    /// Values of this function's flags
    pub fn arguments(&self, matches: &ArgMatches) -> Result<Arguments> {
        self.parser.extract(matches)
    }

    /// The flags that reproduce `args`
    pub fn invocation(&self, args: &Arguments) -> Result<Vec<String>> {
        Ok(generate_args(&self.function, args, &self.opts)?)
    }

    /// Run this function's commands with `args` bound as variables
    pub fn execute(&self, args: &Arguments, ctx: Context) -> Result<()> {
        let ctx = ctx.with_arguments(args);
        ctx.print_debug(&format!(
            "{} {}",
            self.name,
            self.invocation(args)?.join(" ")
        ));

        if self.run.is_empty() {
            ctx.print_info(&format!("Function '{}' has nothing to run", self.name));
            return Ok(());
        }

        execute_all(&self.run, &ctx)
    }
}
