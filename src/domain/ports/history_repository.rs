//! HistoryRepository port
//!
//! Loads and saves the deploy history file kept on each target host
//! (`<home>/.deploy/git/history.yml`).

use crate::domain::entities::DeployHistory;

use super::command_executor::ExecError;

pub trait HistoryRepository {
    /// Load the history at `path`; `Ok(None)` when no file exists
    fn load(&self, path: &str) -> Result<Option<DeployHistory>, HistoryStoreError>;

    /// Replace the history at `path`
    fn save(&self, history: &DeployHistory, path: &str) -> Result<(), HistoryStoreError>;
}

impl<T: HistoryRepository + ?Sized> HistoryRepository for &T {
    fn load(&self, path: &str) -> Result<Option<DeployHistory>, HistoryStoreError> {
        (**self).load(path)
    }

    fn save(&self, history: &DeployHistory, path: &str) -> Result<(), HistoryStoreError> {
        (**self).save(history, path)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryStoreError {
    #[error("failed to access history file: {0}")]
    Access(#[from] ExecError),

    #[error("history file {path} is corrupted: {message}")]
    Corrupted { path: String, message: String },

    #[error("history file {path} has version {found}, expected {expected}")]
    VersionMismatch {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("failed to serialize history: {message}")]
    Serialization { message: String },
}
