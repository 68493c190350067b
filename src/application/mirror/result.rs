//! Mirror Result

use crate::application::ledger::PersistOutcome;
use crate::application::staging::StagingClone;
use crate::domain::entities::{DeployRecord, RecordOutcome};

/// Result of a mirror deploy
#[derive(Debug, Clone)]
pub struct MirrorReport {
    pub staging: StagingClone,
    /// `user@host:path` the tree was copied to
    pub destination: String,
    pub record: DeployRecord,
    pub outcome: RecordOutcome,
    /// Set when the history file was written
    pub persisted: Option<PersistOutcome>,
    /// Transport prompts answered during the copy
    pub matched_prompts: Vec<usize>,
}

impl MirrorReport {
    /// Whether this deploy moved the target to a different commit
    pub fn is_new_commit(&self) -> bool {
        self.outcome == RecordOutcome::Inserted
    }
}
