//! Entry point for the Flex Support CLI.
use std::process::ExitCode;

use clap::Parser;
use flex_support_cli::{
    cli::LaunchArgs,
    lib::telemetry,
    runtime::{self, RuntimeExit},
};

fn main() -> ExitCode {
    match bootstrap() {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LaunchArgs::parse();
    let invocation = args.into_invocation().map_err(RuntimeExit::from_error)?;
    runtime::run(invocation)
}
