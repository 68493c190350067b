//! CommandExecutor port - run a shell command line somewhere
//!
//! Implementations:
//! - `LocalShell` - `sh -c` in the local environment
//! - `SshExecutor` - over ssh on a target host
//! - test doubles that record issued commands
//!
//! Command strings are assembled by interpolation, so callers must quote
//! every interpolated argument with `shell_quote`.

use std::path::{Path, PathBuf};

/// Result type for command execution
pub type ExecResult<T> = Result<T, ExecError>;

/// Command execution errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The command could not be started at all
    Spawn { command: String, message: String },
    /// The command ran and exited non-zero (or was killed)
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::Spawn { command, message } => {
                write!(f, "could not start `{}`: {}", command, message)
            }
            ExecError::Failed {
                command,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "`{}` exited with status {}", command, code)?,
                    None => write!(f, "`{}` was terminated by a signal", command)?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ExecError {}

/// A command line plus how to run it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: String,
    /// Working directory for the duration of the call
    pub cwd: Option<PathBuf>,
    /// Data written to the command's stdin
    pub stdin: Option<String>,
    /// Run with elevated privileges (sudo)
    pub privileged: bool,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Abstract command executor
pub trait CommandExecutor {
    /// Human-readable location, e.g. `local` or `deploy@web1:22`
    fn location(&self) -> String;

    /// Run a command; a non-zero exit is reported in the output, not as an error
    fn execute(&self, request: &CommandRequest) -> ExecResult<CommandOutput>;

    /// Run a command and require exit status 0, returning trimmed stdout
    fn check(&self, request: &CommandRequest) -> ExecResult<String> {
        let output = self.execute(request)?;
        if !output.success() {
            return Err(ExecError::Failed {
                command: request.command.clone(),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout.trim_end().to_string())
    }

    /// Shorthand for `check` with a bare command line
    fn run(&self, command: &str) -> ExecResult<String> {
        self.check(&CommandRequest::new(command))
    }

    /// Shorthand for `check` inside a working directory
    fn run_in(&self, dir: &Path, command: &str) -> ExecResult<String> {
        self.check(&CommandRequest::new(command).in_dir(dir))
    }

    /// Shorthand for `check` with `input` piped to stdin
    fn run_with_input(&self, command: &str, input: &str) -> ExecResult<String> {
        self.check(&CommandRequest::new(command).with_stdin(input))
    }

    /// Shorthand for a privileged `check`
    fn sudo(&self, command: &str) -> ExecResult<String> {
        self.check(&CommandRequest::new(command).privileged())
    }

    /// True when the command exits 0; any failure to run counts as false
    fn succeeds(&self, command: &str) -> bool {
        self.execute(&CommandRequest::new(command))
            .map(|o| o.success())
            .unwrap_or(false)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn location(&self) -> String {
        (**self).location()
    }

    fn execute(&self, request: &CommandRequest) -> ExecResult<CommandOutput> {
        (**self).execute(request)
    }
}
