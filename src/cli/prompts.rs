//! Interactive prompts using dialoguer
//!
//! The converter asks its two questions through [`InputProvider`] so tests
//! (and piped stdin) can answer without a live terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use dialoguer::Input;

pub const MODE_PROMPT: &str = "Enter mode (27z or 2zip)";
pub const PATH_PROMPT: &str = "Enter archive path";

/// Source of answers to prompts
pub trait InputProvider {
    /// Show `prompt` and return the answer without its line ending
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts rendered by dialoguer on a real terminal
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer to '{}'", prompt))?;
        Ok(answer)
    }
}

/// Plain `prompt: ` + one line per answer, for pipes and redirected stdin
#[derive(Debug)]
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> InputProvider for LineInput<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .with_context(|| format!("Failed to read answer to '{}'", prompt))?;
        if read == 0 {
            bail!("No answer given to '{}' (end of input)", prompt);
        }
        // Keep the transcript readable when input is not echoed
        writeln!(self.writer)?;
        Ok(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }
}

/// Canned answers, recording each prompt asked
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("No scripted answer for '{}'", prompt),
        }
    }
}

/// dialoguer when attached to a terminal, line-based otherwise
pub fn stdin_provider() -> Box<dyn InputProvider> {
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        Box::new(TerminalInput)
    } else {
        Box::new(LineInput::new(io::stdin().lock(), io::stdout()))
    }
}
