//! Push Result

use std::path::PathBuf;

/// What happened to the bare repository on the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Complete from an earlier deploy; left alone
    Existing,
    /// Did not exist; created
    Created,
    /// Left incomplete by an interrupted bootstrap; removed and rebuilt
    Rebuilt,
}

/// What happened to the `dest` remote of the local clone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteUpdate {
    Added,
    /// Pointed somewhere else and was corrected
    Updated,
    Unchanged,
}

/// Result of a push-hook deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub clone_path: PathBuf,
    /// Absolute path of the bare repository on the target
    pub bare_repo: String,
    /// Absolute path of the checkout on the target
    pub worktree: String,
    pub bootstrap: BootstrapOutcome,
    pub remote: RemoteUpdate,
}
