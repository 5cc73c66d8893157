//! Command dispatch, output sinks, prompts, and process exit handling.
pub mod dispatch;
pub mod output;
pub mod prompt;
mod startup;

pub use dispatch::{DispatchSettings, Dispatcher, Outcome};
pub use output::{sink_for, OutputSink, QuietSink, StdoutSink};
pub use prompt::{Prompter, TerminalPrompter};
pub use startup::{run, RuntimeExit};
