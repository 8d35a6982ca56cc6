//! zip7z: ZIP ⇄ 7z Conversion CLI
//!
//! Prompts for a mode and an archive, then converts it with the system's
//! `unzip`, `7za` and `zip` programs.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use zip7z::cli::{error_message, report_tools, run_convert, stdin_provider, Cli, Commands};
use zip7z::convert::ExternalArchiver;
use zip7z::utils::{init_logging, print_error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            print_error(&error_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if let Some(Commands::Tools) = cli.command {
        return Ok(if report_tools(&cli.tool_set()) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let archiver = ExternalArchiver::new(cli.tool_set());
    let mut input = stdin_provider();
    run_convert(&cli.convert_options(), input.as_mut(), &archiver)?;

    Ok(ExitCode::SUCCESS)
}
