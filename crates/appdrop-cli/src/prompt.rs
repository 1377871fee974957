//! Operator prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Source of answers for values that were not given on the command line.
pub trait Prompter {
    /// Reads one line of visible input, trimmed.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Reads a secret without echoing it.
    fn password(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt).context("Failed to write prompt")?;
        stdout.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("Standard input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        rpassword::prompt_password(prompt).context("Failed to read password")
    }
}
