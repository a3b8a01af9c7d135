use anyhow::Context;
use argdoc::ArgDocError;
use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = argdoc::cli::run().context("argdoc failed") {
        // clap renders help, version and usage errors itself
        if let Some(ArgDocError::Cli(err)) = e.downcast_ref::<ArgDocError>() {
            err.exit();
        }
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
