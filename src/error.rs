//! Error types for gitship
//!
//! Uses `thiserror` for library errors. Port-level errors
//! (`ExecError`, `HistoryStoreError`) convert into [`DeployError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::CommitLogError;
use crate::domain::ports::{ExecError, HistoryStoreError, InteractiveError};

/// Result type alias for gitship operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// A required local binary is absent (pre-flight only)
    #[error("required tool '{tool}' not found in the local environment")]
    ToolMissing { tool: String },

    /// Clone, fetch, reset or submodule update failed
    #[error("staging refresh failed for {path}: {source}")]
    StagingRefreshFailed {
        path: PathBuf,
        #[source]
        source: ExecError,
    },

    /// Delta copy or push exited non-zero or was signaled
    #[error("transfer to {destination} failed: {source}")]
    TransferFailed {
        destination: String,
        #[source]
        source: InteractiveError,
    },

    /// No prompt matched within the interactive timeout window
    #[error("transfer to {destination} timed out after {seconds}s without output matching a prompt")]
    InteractiveTimeout { destination: String, seconds: u64 },

    /// A commit-log block could not be turned into a deploy record
    #[error("cannot record deploy of '{repo_dir}': {source}")]
    HistoryParse {
        repo_dir: String,
        #[source]
        source: CommitLogError,
    },

    /// Persisting the history file failed
    #[error("cannot persist deploy history to {path}: {source}")]
    HistoryPersist {
        path: String,
        #[source]
        source: HistoryStoreError,
    },

    /// No deploy history exists for the requested directory
    #[error("no deploy history found for '{repo_dir}'")]
    NoHistory { repo_dir: String },

    /// A command on the target host failed
    #[error("remote command failed on {host}: {source}")]
    Remote {
        host: String,
        #[source]
        source: ExecError,
    },

    /// A local command outside the staging refresh failed
    #[error("local command failed: {0}")]
    Local(#[from] ExecError),

    /// The remote bare repository could not be bootstrapped
    #[error("bootstrap of {bare_repo} on {host} failed: {source}")]
    Bootstrap {
        host: String,
        bare_repo: String,
        #[source]
        source: ExecError,
    },

    /// Local checkout is behind the reference it must match
    #[error("git checkout at {path} is not up-to-date against {against} ({behind} commits behind, forgot to pull?)")]
    CheckoutNotUpToDate {
        path: PathBuf,
        against: String,
        behind: u64,
    },

    /// Local checkout carries uncommitted changes
    #[error("git checkout at {path} has {changes} uncommitted changes")]
    CheckoutDirty { path: PathBuf, changes: usize },

    /// A clone or checkout name that is not one plain directory name
    #[error("invalid directory name '{name}': expected a single path component")]
    InvalidDirName { name: String },

    /// Invalid host specification
    #[error("invalid host '{input}': {reason}")]
    InvalidHost { input: String, reason: String },

    /// Configuration file could not be read or parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
