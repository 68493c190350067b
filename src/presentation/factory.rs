//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use crate::application::{DeployContext, HistoryQuery, MirrorSync, PushHookSync};
use crate::infrastructure::{LocalShell, PtyRunner, SshExecutor, YamlHistoryRepository};

/// Type alias for the concrete MirrorSync with all dependencies
pub type ConcreteMirrorSync =
    MirrorSync<LocalShell, SshExecutor, PtyRunner, YamlHistoryRepository<SshExecutor>>;

/// Type alias for the concrete PushHookSync with all dependencies
pub type ConcretePushHookSync = PushHookSync<LocalShell, SshExecutor, PtyRunner>;

/// Type alias for the concrete HistoryQuery with all dependencies
pub type ConcreteHistoryQuery = HistoryQuery<SshExecutor, YamlHistoryRepository<SshExecutor>>;

/// Mirror deploys to the context's target over ssh + rsync
pub fn create_mirror_sync(ctx: &DeployContext) -> ConcreteMirrorSync {
    MirrorSync::new(
        LocalShell::new(),
        remote_executor(ctx),
        PtyRunner::new(),
        YamlHistoryRepository::new(remote_executor(ctx)),
    )
}

/// Push-hook deploys to the context's target
pub fn create_push_hook_sync(ctx: &DeployContext) -> ConcretePushHookSync {
    PushHookSync::new(LocalShell::new(), remote_executor(ctx), PtyRunner::new())
}

/// Read-only history access on the context's target
pub fn create_history_query(ctx: &DeployContext) -> ConcreteHistoryQuery {
    HistoryQuery::new(
        remote_executor(ctx),
        YamlHistoryRepository::new(remote_executor(ctx)),
    )
}

/// New host keys are accepted on first contact. Batch mode is only used
/// when no password is configured; otherwise ssh may ask on the terminal.
fn remote_executor(ctx: &DeployContext) -> SshExecutor {
    let executor =
        SshExecutor::new(ctx.target().clone()).with_option("StrictHostKeyChecking=accept-new");
    if ctx.has_password() {
        executor
    } else {
        executor.with_option("BatchMode=yes")
    }
}
