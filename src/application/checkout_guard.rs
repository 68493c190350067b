//! Guards for the checkout a deploy is started from
//!
//! Catch the two classic mistakes of a shared deploy checkout: deploying
//! from a checkout that is behind its upstream, and deploying uncommitted
//! local edits.

use std::path::Path;

use tracing::debug;

use crate::domain::ports::{CommandExecutor, ExecError};
use crate::domain::value_objects::shell_quote;
use crate::error::{DeployError, DeployResult};

pub struct CheckoutGuard<L> {
    local: L,
}

impl<L: CommandExecutor> CheckoutGuard<L> {
    pub fn new(local: L) -> Self {
        Self { local }
    }

    /// Fetch, then fail if `against` has commits `HEAD` lacks
    pub fn ensure_up_to_date(&self, path: &Path, against: &str) -> DeployResult<()> {
        self.local
            .run_in(path, "git fetch")
            .map_err(DeployError::Local)?;

        let command = format!("git rev-list --count {}", shell_quote(&format!("HEAD..{}", against)));
        let output = self
            .local
            .run_in(path, &command)
            .map_err(DeployError::Local)?;
        let behind: u64 = output.trim().parse().map_err(|_| {
            DeployError::Local(ExecError::Failed {
                command: command.clone(),
                code: Some(0),
                stderr: format!("expected a commit count, got '{}'", output.trim()),
            })
        })?;

        debug!(behind, "[local] {} against {}", path.display(), against);
        if behind > 0 {
            return Err(DeployError::CheckoutNotUpToDate {
                path: path.to_path_buf(),
                against: against.to_string(),
                behind,
            });
        }
        Ok(())
    }

    /// Fail if the checkout has uncommitted or untracked changes
    pub fn ensure_clean(&self, path: &Path) -> DeployResult<()> {
        let status = self
            .local
            .run_in(path, "git status --porcelain")
            .map_err(DeployError::Local)?;
        let changes = status.lines().filter(|l| !l.trim().is_empty()).count();
        if changes > 0 {
            return Err(DeployError::CheckoutDirty {
                path: path.to_path_buf(),
                changes,
            });
        }
        Ok(())
    }
}
