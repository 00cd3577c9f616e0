use std::fmt;

use anyhow::Result;
use calculator::{Number, Session};
use colored::Colorize;
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;

/// The user pressed Ctrl-C or Ctrl-D while we were waiting for input.
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input interrupted")
    }
}

impl std::error::Error for Interrupted {}

pub struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub fn new() -> Result<Self> {
        Ok(Prompter {
            editor: DefaultEditor::new()?,
        })
    }

    /// Reads one trimmed line.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        debug!(%err, "line not added to input history");
                    }
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(Interrupted.into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Asks until the answer is a number, `M` or (once a result exists) `U`.
    pub fn operand(&mut self, session: &Session, prompt: &str) -> Result<Number> {
        loop {
            let line = self.line(prompt)?;
            match session.resolve_operand(&line) {
                Ok(number) => return Ok(number),
                Err(err) => {
                    eprintln!("{} {err}", "Error:".red().bold());
                    eprintln!("  Use 'M' for memory or 'U' for the last result");
                }
            }
        }
    }
}
