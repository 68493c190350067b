//! InteractiveRunner port - drive a subprocess that asks questions
//!
//! Used for transfers whose transport may stop to ask for host-key
//! confirmation or a password. The runner waits for output matching one of
//! an ordered list of prompt patterns and answers with the entry at the same
//! position.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// A program and its arguments, passed through without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl InteractiveCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The command line as it would be typed into a shell
    pub fn display_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|word| display_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn display_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=+,%".contains(c));
    if plain {
        word.to_string()
    } else {
        crate::domain::value_objects::shell_quote(word)
    }
}

/// A line sent in reply to a prompt
#[derive(Debug)]
pub enum Answer {
    Line(String),
    /// Never written to logs or the output sink
    Secret(SecretString),
}

impl Answer {
    pub fn line(text: impl Into<String>) -> Self {
        Answer::Line(text.into())
    }

    pub fn secret(secret: SecretString) -> Self {
        Answer::Secret(secret)
    }

    /// The text to type, without the trailing newline
    pub fn reveal(&self) -> &str {
        match self {
            Answer::Line(text) => text,
            Answer::Secret(secret) => secret.expose_secret(),
        }
    }

    /// Safe for logs
    pub fn redacted(&self) -> &str {
        match self {
            Answer::Line(text) => text,
            Answer::Secret(_) => "********",
        }
    }
}

/// States of one interactive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    Running,
    MatchedPrompt(usize),
    ExitedSuccess,
    ExitedFailure { code: u32, signal: Option<String> },
    TimedOut,
}

impl RunnerState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunnerState::ExitedSuccess | RunnerState::ExitedFailure { .. } | RunnerState::TimedOut
        )
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveReport {
    /// Prompt indices in the order they were matched
    pub matched_prompts: Vec<usize>,
    pub final_state: RunnerState,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InteractiveError {
    #[error("could not start `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("I/O error while driving `{command}`: {message}")]
    Io { command: String, message: String },

    #[error("`{command}` produced no matching prompt within {}s", .after.as_secs())]
    TimedOut { command: String, after: Duration },

    #[error("`{command}` failed with exit status {code}{}", signal_suffix(.signal))]
    Exited {
        command: String,
        code: u32,
        signal: Option<String>,
    },
}

fn signal_suffix(signal: &Option<String>) -> String {
    match signal {
        Some(signal) => format!(" (signal {})", signal),
        None => String::new(),
    }
}

pub trait InteractiveRunner {
    /// Run `command`, answering `prompts[i]` with `answers[i]` until it exits.
    ///
    /// Prompts without a matching answer entry are matched but not answered.
    /// All output is mirrored to `sink`, preceded by the command line itself.
    /// Success means exit status 0; anything else is an error.
    fn run(
        &self,
        command: &InteractiveCommand,
        prompts: &[Regex],
        answers: &[Answer],
        timeout: Duration,
        sink: &mut dyn Write,
    ) -> Result<InteractiveReport, InteractiveError>;
}

impl<T: InteractiveRunner + ?Sized> InteractiveRunner for &T {
    fn run(
        &self,
        command: &InteractiveCommand,
        prompts: &[Regex],
        answers: &[Answer],
        timeout: Duration,
        sink: &mut dyn Write,
    ) -> Result<InteractiveReport, InteractiveError> {
        (**self).run(command, prompts, answers, timeout, sink)
    }
}
