//! Push-hook Use Case
//!
//! 1. Keep a local clone of the branch, fetched and hard-reset
//! 2. Create the checkout directory on the target
//! 3. Bootstrap the bare repository and its checkout hook
//! 4. Point the clone's `dest` remote at the bare repository
//! 5. Force-push; the hook checks the tree out on the target

use std::io::Write;

use tracing::info;

use crate::application::context::{remote_join, transfer_error, DeployContext};
use crate::application::staging::LocalStagingManager;
use crate::domain::ports::{CommandExecutor, CommandRequest, InteractiveCommand, InteractiveRunner};
use crate::domain::value_objects::shell_quote;
use crate::error::{DeployError, DeployResult};

use super::bootstrap::BareRepoBootstrap;
use super::options::PushRequest;
use super::result::{PushReport, RemoteUpdate};

/// Name of the remote the local clone pushes to
const DEST_REMOTE: &str = "dest";

/// Push-hook deploy strategy
pub struct PushHookSync<L, R, I> {
    local: L,
    remote: R,
    runner: I,
}

impl<L, R, I> PushHookSync<L, R, I>
where
    L: CommandExecutor,
    R: CommandExecutor,
    I: InteractiveRunner,
{
    pub fn new(local: L, remote: R, runner: I) -> Self {
        Self {
            local,
            remote,
            runner,
        }
    }

    pub fn deploy(
        &self,
        ctx: &DeployContext,
        request: &PushRequest,
        sink: &mut dyn Write,
    ) -> DeployResult<PushReport> {
        let staging = LocalStagingManager::new(&self.local);
        staging.ensure_tools(&["git"])?;
        let clone_path = staging.ensure_checkout(
            &request.repo_url,
            &request.dest_name,
            &request.branch,
            &ctx.push_clone_parent(),
        )?;

        let host = ctx.target().to_string();
        let home = ctx.remote_home(&self.remote)?.to_string();
        let worktree = remote_join(
            &home,
            &remote_join(&request.dest_base_path, &request.dest_name),
        );
        self.remote
            .run(&format!("mkdir -p {}", shell_quote(&worktree)))
            .map_err(|source| DeployError::Remote {
                host: host.clone(),
                source,
            })?;

        let bare_repo = remote_join(&home, &format!(".gitpush/{}.git", request.dest_name));
        let bootstrap = BareRepoBootstrap::new(&self.remote, host).ensure(
            &bare_repo,
            &worktree,
            &request.branch,
        )?;

        let url = ctx.target().ssh_url(&bare_repo);
        let remote = self.ensure_dest_remote(&clone_path, &url)?;

        let push = InteractiveCommand::new("git")
            .args(["push", DEST_REMOTE])
            .arg(format!("+HEAD:refs/heads/{}", request.branch))
            .current_dir(&clone_path);
        self.runner
            .run(
                &push,
                &ctx.transport_prompts(),
                &ctx.transport_answers(),
                ctx.interactive_timeout(),
                sink,
            )
            .map_err(|e| transfer_error(&url, e))?;

        Ok(PushReport {
            clone_path,
            bare_repo,
            worktree,
            bootstrap,
            remote,
        })
    }

    fn ensure_dest_remote(
        &self,
        clone_path: &std::path::Path,
        url: &str,
    ) -> DeployResult<RemoteUpdate> {
        let current = self
            .local
            .execute(
                &CommandRequest::new(format!("git remote get-url {}", DEST_REMOTE))
                    .in_dir(clone_path),
            )
            .map_err(DeployError::Local)?;

        let (command, update) = if !current.success() {
            (
                format!("git remote add {} {}", DEST_REMOTE, shell_quote(url)),
                RemoteUpdate::Added,
            )
        } else if current.stdout.trim() != url {
            info!(
                "[local] repointing remote {} from {} to {}",
                DEST_REMOTE,
                current.stdout.trim(),
                url
            );
            (
                format!("git remote set-url {} {}", DEST_REMOTE, shell_quote(url)),
                RemoteUpdate::Updated,
            )
        } else {
            return Ok(RemoteUpdate::Unchanged);
        };

        self.local
            .run_in(clone_path, &command)
            .map_err(DeployError::Local)?;
        Ok(update)
    }
}
