//! Local shell executor
//!
//! Runs command lines through `sh -c` on the machine doing the deploy.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ports::{
    CommandExecutor, CommandOutput, CommandRequest, ExecError, ExecResult,
};

/// Executes commands in the local environment
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalShell;

impl LocalShell {
    pub fn new() -> Self {
        Self
    }

    /// Name of the user running the deploy
    pub fn whoami(&self) -> ExecResult<String> {
        self.run("whoami")
    }
}

impl CommandExecutor for LocalShell {
    fn location(&self) -> String {
        "local".to_string()
    }

    fn execute(&self, request: &CommandRequest) -> ExecResult<CommandOutput> {
        let command = if request.privileged {
            format!("sudo {}", request.command)
        } else {
            request.command.clone()
        };

        debug!(cwd = ?request.cwd, "[local] {}", command);

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&command)
            .stdin(if request.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &request.cwd {
            cmd.current_dir(dir);
        }

        let spawn_err = |e: std::io::Error| ExecError::Spawn {
            command: command.clone(),
            message: e.to_string(),
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        if let Some(input) = &request.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes()).map_err(spawn_err)?;
            }
        }

        let output = child.wait_with_output().map_err(spawn_err)?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
