#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use metriq::cli::app::{Cli, Command};
use metriq::cli::commands;
use metriq::dataset::Dataset;
use metriq::models::EnvelopeCommandFailure;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_CONTRACT_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = command_name(&cli.command);

    match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("metriq: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    // The dataset is built once here and flows by reference through every
    // command; nothing below mutates it.
    let dataset = Dataset::generate();

    match cli.command {
        Command::Query(args) => commands::query::run(&args, &dataset),
        Command::Tools(args) => commands::tools::run(&args, &dataset),
        Command::Dataset(args) => commands::dataset::run(&args, &dataset),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<EnvelopeCommandFailure>().is_some() {
        EXIT_CONTRACT_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Query(_) => "query",
        Command::Tools(_) => "tools",
        Command::Dataset(_) => "dataset",
    }
}
