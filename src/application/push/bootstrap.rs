//! Bare repository bootstrap
//!
//! Layout on the target:
//!
//! ```text
//! <home>/.gitpush/<dest>.git/
//!     hooks/post-receive        git checkout -f
//!     gitship-bootstrap.done    written last
//! ```
//!
//! The marker makes the multi-step bootstrap restartable: a bare repository
//! without it was interrupted and is rebuilt from scratch.
//!
//! `HEAD` is repointed at the deployed branch on every deploy, since the
//! hook checks out whatever `HEAD` names.

use tracing::{info, warn};

use crate::domain::ports::{CommandExecutor, CommandRequest, ExecError};
use crate::domain::value_objects::shell_quote;
use crate::error::{DeployError, DeployResult};

use super::result::BootstrapOutcome;

/// File written inside the bare repository once bootstrap has completed
pub const BOOTSTRAP_MARKER: &str = "gitship-bootstrap.done";

const POST_RECEIVE_HOOK: &str = "#!/bin/sh\ngit checkout -f\n";

pub struct BareRepoBootstrap<'a, R> {
    remote: &'a R,
    host: String,
}

impl<'a, R: CommandExecutor> BareRepoBootstrap<'a, R> {
    pub fn new(remote: &'a R, host: impl Into<String>) -> Self {
        Self {
            remote,
            host: host.into(),
        }
    }

    /// Make sure `bare_repo` exists, is marked complete, and checks
    /// `branch` out into `worktree` on every push.
    pub fn ensure(
        &self,
        bare_repo: &str,
        worktree: &str,
        branch: &str,
    ) -> DeployResult<BootstrapOutcome> {
        let outcome = self.bootstrap(bare_repo, worktree)?;
        self.step(
            bare_repo,
            CommandRequest::new(format!(
                "git symbolic-ref HEAD {}",
                shell_quote(&format!("refs/heads/{}", branch))
            ))
            .in_dir(bare_repo),
        )?;
        Ok(outcome)
    }

    fn bootstrap(&self, bare_repo: &str, worktree: &str) -> DeployResult<BootstrapOutcome> {
        let marker = format!("{}/{}", bare_repo, BOOTSTRAP_MARKER);
        if self.test_path(bare_repo, &format!("test -f {}", shell_quote(&marker)))? {
            return Ok(BootstrapOutcome::Existing);
        }

        let outcome = if self.test_path(bare_repo, &format!("test -d {}", shell_quote(bare_repo)))? {
            warn!(
                "[{}] {} has no completion marker; rebuilding it",
                self.host, bare_repo
            );
            self.step(bare_repo, CommandRequest::new(format!("rm -rf {}", shell_quote(bare_repo))))?;
            BootstrapOutcome::Rebuilt
        } else {
            BootstrapOutcome::Created
        };

        info!("[{}] bootstrapping {} -> {}", self.host, bare_repo, worktree);
        self.step(bare_repo, CommandRequest::new(format!("mkdir -p {}", shell_quote(bare_repo))))?;

        let inside = |command: String| CommandRequest::new(command).in_dir(bare_repo);
        for request in [
            inside("git init --bare -q".to_string()),
            inside("git --bare update-server-info".to_string()),
            inside("git config --bool core.bare false".to_string()),
            inside(format!("git config --path core.worktree {}", shell_quote(worktree))),
            inside("git config receive.denycurrentbranch ignore".to_string()),
            inside("cat > hooks/post-receive".to_string()).with_stdin(POST_RECEIVE_HOOK),
            inside("chmod 755 hooks/post-receive".to_string()),
            inside(format!("touch {}", BOOTSTRAP_MARKER)),
        ] {
            self.step(bare_repo, request)?;
        }

        Ok(outcome)
    }

    /// `true` on exit 0, `false` on exit 1, error otherwise
    fn test_path(&self, bare_repo: &str, command: &str) -> DeployResult<bool> {
        let output = self
            .remote
            .execute(&CommandRequest::new(command))
            .map_err(|source| self.failed(bare_repo, source))?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => Err(self.failed(
                bare_repo,
                ExecError::Failed {
                    command: command.to_string(),
                    code,
                    stderr: output.stderr,
                },
            )),
        }
    }

    fn step(&self, bare_repo: &str, request: CommandRequest) -> DeployResult<()> {
        self.remote
            .check(&request)
            .map(|_| ())
            .map_err(|source| self.failed(bare_repo, source))
    }

    fn failed(&self, bare_repo: &str, source: ExecError) -> DeployError {
        DeployError::Bootstrap {
            host: self.host.clone(),
            bare_repo: bare_repo.to_string(),
            source,
        }
    }
}
