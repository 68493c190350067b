//! Deploy history ledger
//!
//! Loads the history file kept on a target, records deploys into it and
//! writes it back. Loading never fails a deploy: an unreadable file is
//! reported with `warn!` and replaced by an empty history. Recording does
//! fail the deploy when the commit log cannot be parsed.
//!
//! There is no locking. Each persist re-reads the stored generation first
//! and warns when another deploy wrote in the meantime; the last writer wins.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::entities::{
    CommitInfo, DeployHistory, DeployRecord, DeploySource, RecordOutcome,
};
use crate::domain::ports::HistoryRepository;
use crate::error::{DeployError, DeployResult};

/// `<home>/.deploy/git/history.yml`
pub fn history_path(home: &str) -> String {
    super::context::remote_join(home, ".deploy/git/history.yml")
}

/// Result of a persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Generation now stored
    pub generation: u64,
    /// Another writer changed the file since it was loaded
    pub overwrote_concurrent: bool,
}

pub struct DeployHistoryLedger<H> {
    repo: H,
}

impl<H: HistoryRepository> DeployHistoryLedger<H> {
    pub fn new(repo: H) -> Self {
        Self { repo }
    }

    /// Current history at `path`, or an empty one when there is none or it
    /// cannot be read
    pub fn load(&self, path: &str) -> DeployHistory {
        match self.repo.load(path) {
            Ok(Some(history)) => {
                debug!(
                    generation = history.generation(),
                    "loaded deploy history from {}", path
                );
                history
            }
            Ok(None) => DeployHistory::new(),
            Err(e) => {
                warn!("unable to load history file {}: {}", path, e);
                DeployHistory::new()
            }
        }
    }

    /// Write `history` to `path`, advancing its generation
    pub fn persist(&self, history: &mut DeployHistory, path: &str) -> DeployResult<PersistOutcome> {
        let loaded_generation = history.generation();
        let overwrote_concurrent = match self.repo.load(path) {
            Ok(Some(stored)) if stored.generation() != loaded_generation => {
                warn!(
                    "history file {} changed since it was loaded (generation {} -> {}); overwriting",
                    path,
                    loaded_generation,
                    stored.generation()
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                debug!("could not re-read {} before writing: {}", path, e);
                false
            }
        };

        let generation = history.bump_generation();
        self.repo
            .save(history, path)
            .map_err(|source| DeployError::HistoryPersist {
                path: path.to_string(),
                source,
            })?;

        Ok(PersistOutcome {
            generation,
            overwrote_concurrent,
        })
    }
}

/// Parse `fuller_log` and record it as a deploy of `repo_dir`
pub fn record_deploy(
    history: &mut DeployHistory,
    repo_dir: &str,
    fuller_log: &str,
    source: DeploySource,
    now: DateTime<Utc>,
) -> DeployResult<(RecordOutcome, DeployRecord)> {
    let commit = parse_commit(repo_dir, fuller_log)?;
    Ok(record_commit(history, repo_dir, commit, source, now))
}

/// Record an already parsed commit
pub fn record_commit(
    history: &mut DeployHistory,
    repo_dir: &str,
    commit: CommitInfo,
    source: DeploySource,
    now: DateTime<Utc>,
) -> (RecordOutcome, DeployRecord) {
    let (outcome, record) = history.record(repo_dir, commit, source, now);
    debug!(?outcome, hash = %record.commit.short_hash(), "recorded deploy of {}", repo_dir);
    (outcome, record.clone())
}

pub(crate) fn parse_commit(repo_dir: &str, fuller_log: &str) -> DeployResult<CommitInfo> {
    CommitInfo::parse_fuller(fuller_log).map_err(|source| DeployError::HistoryParse {
        repo_dir: repo_dir.to_string(),
        source,
    })
}
