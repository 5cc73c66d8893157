//! Interactive input used by `profiles --create-profile`.
use dialoguer::{Input, Password};

use crate::lib::errors::CliError;

/// Source of interactive answers.
pub trait Prompter {
    /// Visible free-text answer; may be empty.
    fn input(&mut self, prompt: &str) -> Result<String, CliError>;
    /// Hidden answer (passwords, tokens).
    fn secret(&mut self, prompt: &str) -> Result<String, CliError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String, CliError> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> Result<String, CliError> {
        let answer = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(answer.trim().to_string())
    }
}
