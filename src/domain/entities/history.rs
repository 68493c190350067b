//! Deploy history entity
//!
//! Maps each deployed repository directory to its deploy records, newest
//! first. Consecutive deploys of the same commit collapse into one record
//! whose timestamp is refreshed. Pure data - persistence lives behind
//! `HistoryRepository`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::CommitInfo;

/// Current history file format version
pub const HISTORY_VERSION: u32 = 1;

/// Where a deployed tree came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySource {
    pub repo_url: String,
    pub refspec: String,
    pub repo_dir: String,
}

impl DeploySource {
    pub fn new(
        repo_url: impl Into<String>,
        refspec: impl Into<String>,
        repo_dir: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            refspec: refspec.into(),
            repo_dir: repo_dir.into(),
        }
    }
}

/// One completed deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRecord {
    pub timestamp: DateTime<Utc>,
    pub source: DeploySource,
    pub commit: CommitInfo,
}

/// What `DeployHistory::record` did with a deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new head record was inserted
    Inserted,
    /// The head record already held this commit; only its timestamp moved
    Refreshed,
}

/// Deploy records per repository directory, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployHistory {
    #[serde(default = "default_version")]
    version: u32,
    /// Bumped on every persist; used to notice concurrent writers
    #[serde(default)]
    generation: u64,
    #[serde(default)]
    repos: BTreeMap<String, Vec<DeployRecord>>,
}

fn default_version() -> u32 {
    HISTORY_VERSION
}

impl Default for DeployHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployHistory {
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            generation: 0,
            repos: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance the generation token ahead of a write
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Record a deploy of `commit` into `repo_dir`.
    ///
    /// If the newest record for `repo_dir` has the same commit hash, its
    /// timestamp is set to `now` and no record is added.
    pub fn record(
        &mut self,
        repo_dir: &str,
        commit: CommitInfo,
        source: DeploySource,
        now: DateTime<Utc>,
    ) -> (RecordOutcome, &DeployRecord) {
        let records = self.repos.entry(repo_dir.to_string()).or_default();

        let outcome = match records.first_mut() {
            Some(head) if head.commit.hash == commit.hash => {
                head.timestamp = now;
                RecordOutcome::Refreshed
            }
            _ => {
                records.insert(
                    0,
                    DeployRecord {
                        timestamp: now,
                        source,
                        commit,
                    },
                );
                RecordOutcome::Inserted
            }
        };

        (outcome, &records[0])
    }

    /// Records for `repo_dir`, newest first
    pub fn repo_history(&self, repo_dir: &str) -> Option<&[DeployRecord]> {
        self.repos.get(repo_dir).map(Vec::as_slice)
    }

    /// Most recent deploy of `repo_dir`
    pub fn latest(&self, repo_dir: &str) -> Option<&DeployRecord> {
        self.repos.get(repo_dir).and_then(|r| r.first())
    }

    pub fn repo_dirs(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn commit(hash: &str) -> CommitInfo {
        CommitInfo {
            hash: hash.to_string(),
            author: "Jane Doe <jane@example.com>".to_string(),
            authored_date: chrono::DateTime::parse_from_rfc3339("2024-03-05T14:07:31+02:00")
                .unwrap(),
            title: format!("commit {}", hash),
            message_body: vec![],
        }
    }

    fn source() -> DeploySource {
        DeploySource::new("https://example/app.git", "main", "app")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_history_is_empty() {
        let history = DeployHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.version(), HISTORY_VERSION);
        assert_eq!(history.generation(), 0);
        assert!(history.repo_history("app").is_none());
    }

    #[test]
    fn first_deploy_inserts_record() {
        let mut history = DeployHistory::new();
        let (outcome, record) = history.record("app", commit("aaa"), source(), t0());
        assert_eq!(outcome, RecordOutcome::Inserted);
        assert_eq!(record.commit.hash, "aaa");
        assert_eq!(history.repo_history("app").unwrap().len(), 1);
    }

    #[test]
    fn same_commit_refreshes_timestamp_only() {
        let mut history = DeployHistory::new();
        history.record("app", commit("aaa"), source(), t0());
        let later = t0() + Duration::minutes(5);
        let (outcome, record) = history.record("app", commit("aaa"), source(), later);

        assert_eq!(outcome, RecordOutcome::Refreshed);
        assert_eq!(record.timestamp, later);
        assert_eq!(history.repo_history("app").unwrap().len(), 1);
    }

    #[test]
    fn new_commits_go_to_the_front() {
        let mut history = DeployHistory::new();
        history.record("app", commit("aaa"), source(), t0());
        history.record("app", commit("bbb"), source(), t0() + Duration::minutes(1));

        let hashes: Vec<_> = history
            .repo_history("app")
            .unwrap()
            .iter()
            .map(|r| r.commit.hash.as_str())
            .collect();
        assert_eq!(hashes, vec!["bbb", "aaa"]);
        assert_eq!(history.latest("app").unwrap().commit.hash, "bbb");
    }

    #[test]
    fn redeploying_an_older_commit_is_a_new_record() {
        let mut history = DeployHistory::new();
        history.record("app", commit("aaa"), source(), t0());
        history.record("app", commit("bbb"), source(), t0());
        history.record("app", commit("aaa"), source(), t0());
        assert_eq!(history.repo_history("app").unwrap().len(), 3);
    }

    #[test]
    fn repo_dirs_are_independent() {
        let mut history = DeployHistory::new();
        history.record("app", commit("aaa"), source(), t0());
        history.record("api", commit("aaa"), source(), t0());
        assert_eq!(history.len(), 2);
        assert_eq!(history.repo_dirs().collect::<Vec<_>>(), vec!["api", "app"]);
    }

    #[test]
    fn bump_generation_increments() {
        let mut history = DeployHistory::new();
        assert_eq!(history.bump_generation(), 1);
        assert_eq!(history.bump_generation(), 2);
    }
}
