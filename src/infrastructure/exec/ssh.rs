//! SSH executor
//!
//! Runs command lines on a target host through the system `ssh` client.
//! Authentication is whatever the local ssh setup provides (agent, keys,
//! `~/.ssh/config`). Extra `-o` options are chosen by the caller, e.g.
//! `BatchMode=yes` when no one is around to type a password.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::ports::{
    CommandExecutor, CommandOutput, CommandRequest, ExecError, ExecResult,
};
use crate::domain::value_objects::{shell_quote_path, HostIdentity};

/// Executes commands on a remote host via SSH
#[derive(Debug, Clone)]
pub struct SshExecutor {
    target: HostIdentity,
    options: Vec<String>,
}

impl SshExecutor {
    pub fn new(target: HostIdentity) -> Self {
        Self {
            target,
            options: Vec::new(),
        }
    }

    /// Add an `-o` option (e.g. `StrictHostKeyChecking=accept-new`)
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn target(&self) -> &HostIdentity {
        &self.target
    }

    /// The command line as the remote shell will see it
    pub(crate) fn remote_command(request: &CommandRequest) -> String {
        let mut command = String::new();
        if let Some(dir) = &request.cwd {
            command.push_str(&format!("cd {} && ", shell_quote_path(dir)));
        }
        if request.privileged {
            command.push_str("sudo ");
        }
        command.push_str(&request.command);
        command
    }

    pub(crate) fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.target.port().to_string()];
        for option in &self.options {
            args.push("-o".to_string());
            args.push(option.clone());
        }
        args.push(self.target.ssh_destination());
        args.push(remote_command.to_string());
        args
    }
}

impl CommandExecutor for SshExecutor {
    fn location(&self) -> String {
        self.target.to_string()
    }

    fn execute(&self, request: &CommandRequest) -> ExecResult<CommandOutput> {
        let remote_command = Self::remote_command(request);
        debug!("[{}] {}", self.target, remote_command);

        let spawn_err = |e: std::io::Error| ExecError::Spawn {
            command: remote_command.clone(),
            message: e.to_string(),
        };

        let mut child = Command::new("ssh")
            .args(self.ssh_args(&remote_command))
            .stdin(if request.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

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
