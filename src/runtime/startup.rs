use std::process::ExitCode;

use anyhow::Error;
use tracing::info;

use super::{
    dispatch::{DispatchSettings, Dispatcher},
    output::sink_for,
    prompt::TerminalPrompter,
};
use crate::{
    api::HttpClientFactory,
    cli::Invocation,
    config::{telemetry::log_store_source, ProfileStore},
    lib::errors::CliError,
};

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("error: {err:#}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    /// Prefix the message with the error's stable code and keep its exit status.
    pub fn from_cli_error(err: CliError) -> Self {
        Self {
            message: format!("error[{}]: {err}", err.code()),
            exit_code: err.exit_code(),
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

impl From<CliError> for RuntimeExit {
    fn from(value: CliError) -> Self {
        Self::from_cli_error(value)
    }
}

/// Run one invocation against the real platform and terminal.
pub fn run(invocation: Invocation) -> Result<(), RuntimeExit> {
    log_store_source(&invocation.store_path, invocation.store_path_overridden);
    let store = ProfileStore::from_resolution(invocation.store_path.clone());
    let clients = HttpClientFactory::from_env();
    let mut prompter = TerminalPrompter;
    let mut sink = sink_for(invocation.quiet);

    let mut dispatcher = Dispatcher::new(
        &store,
        &clients,
        &mut prompter,
        sink.as_mut(),
        DispatchSettings {
            output_dir: invocation.output_dir.clone(),
            page_size: invocation.page_size,
        },
    );
    let outcome = dispatcher.dispatch(&invocation.selection, &invocation.command)?;

    info!(
        target: "flex_support_cli::runtime",
        outcome = ?outcome,
        "Command finished"
    );
    Ok(())
}
