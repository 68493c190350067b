//! Mirror Use Case
//!
//! 1. Check that `git` and `rsync` exist locally
//! 2. Refresh the staging clone and parse its head commit
//! 3. Create the destination directory on the target
//! 4. Load the deploy history (when tracked)
//! 5. rsync the staging root to the target
//! 6. Record the deploy and persist the history (when tracked)
//!
//! Nothing is written to the history unless the copy succeeded.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::application::context::{remote_join, transfer_error, DeployContext};
use crate::application::ledger::{history_path, parse_commit, record_commit, DeployHistoryLedger};
use crate::application::staging::LocalStagingManager;
use crate::domain::entities::{DeployHistory, DeploySource};
use crate::domain::ports::{
    CommandExecutor, HistoryRepository, InteractiveCommand, InteractiveRunner,
};
use crate::domain::value_objects::{shell_quote, HostIdentity};
use crate::error::{DeployError, DeployResult};

use super::options::{MirrorOptions, MirrorRequest};
use super::result::MirrorReport;

/// Delta-copy deploy strategy
pub struct MirrorSync<L, R, I, H> {
    local: L,
    remote: R,
    runner: I,
    ledger: DeployHistoryLedger<H>,
}

impl<L, R, I, H> MirrorSync<L, R, I, H>
where
    L: CommandExecutor,
    R: CommandExecutor,
    I: InteractiveRunner,
    H: HistoryRepository,
{
    pub fn new(local: L, remote: R, runner: I, history: H) -> Self {
        Self {
            local,
            remote,
            runner,
            ledger: DeployHistoryLedger::new(history),
        }
    }

    pub fn deploy(
        &self,
        ctx: &DeployContext,
        request: &MirrorRequest,
        options: &MirrorOptions,
        sink: &mut dyn Write,
    ) -> DeployResult<MirrorReport> {
        let staging = LocalStagingManager::new(&self.local);
        staging.ensure_tools(&["git", "rsync"])?;

        let staging_root = ctx.staging_root();
        let clone = staging.ensure_fresh(
            &request.repo_url,
            &request.repo_dir,
            &request.refspec,
            &staging_root,
        )?;
        let commit = parse_commit(&request.repo_dir, &clone.fuller_log)?;
        info!(
            "[local] {} is at {} ({})",
            request.repo_dir,
            commit.short_hash(),
            commit.title
        );

        let home = match &options.home {
            Some(home) => home.clone(),
            None => ctx.remote_home(&self.remote)?.to_string(),
        };
        let destination = remote_join(&home, &options.base_dir);
        self.remote
            .run(&format!("mkdir -p {}", shell_quote(&destination)))
            .map_err(|source| DeployError::Remote {
                host: ctx.target().to_string(),
                source,
            })?;

        let history_file = history_path(&home);
        let mut history = if options.save_history {
            self.ledger.load(&history_file)
        } else {
            DeployHistory::new()
        };

        let command = rsync_command(
            ctx.target(),
            &staging_root,
            &destination,
            options.delete_extraneous,
        );
        let target = format!("{}:{}", ctx.target().user_at_host(), destination);
        let transfer = self
            .runner
            .run(
                &command,
                &ctx.transport_prompts(),
                &ctx.transport_answers(),
                ctx.interactive_timeout(),
                sink,
            )
            .map_err(|e| transfer_error(&target, e))?;

        let source = DeploySource::new(&request.repo_url, &request.refspec, &request.repo_dir);
        let (outcome, record) =
            record_commit(&mut history, &request.repo_dir, commit, source, Utc::now());

        let persisted = if options.save_history {
            Some(self.ledger.persist(&mut history, &history_file)?)
        } else {
            None
        };

        Ok(MirrorReport {
            staging: clone,
            destination: target,
            record,
            outcome,
            persisted,
            matched_prompts: transfer.matched_prompts,
        })
    }
}

/// `rsync` invocation copying `staging_root/` into `destination` on `target`
pub fn rsync_command(
    target: &HostIdentity,
    staging_root: &Path,
    destination: &str,
    delete_extraneous: bool,
) -> InteractiveCommand {
    let mut command = InteractiveCommand::new("rsync");
    if delete_extraneous {
        command = command.arg("--delete-during");
    }
    command
        .args(["--protect-args", "--exclude", ".git/", "-lpthrvz"])
        .arg(format!("--rsh=ssh -p {}", target.port()))
        .arg(format!(
            "{}/",
            staging_root.to_string_lossy().trim_end_matches('/')
        ))
        .arg(format!("{}:{}", target.user_at_host(), destination))
}
