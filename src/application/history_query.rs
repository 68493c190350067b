//! Read-only view of the deploy history kept on a target

use crate::application::context::DeployContext;
use crate::application::ledger::{history_path, DeployHistoryLedger};
use crate::domain::entities::DeployRecord;
use crate::domain::ports::{CommandExecutor, HistoryRepository};
use crate::error::{DeployError, DeployResult};

/// Records shown when no limit is given
pub const DEFAULT_LIMIT: usize = 10;

pub struct HistoryQuery<R, H> {
    remote: R,
    ledger: DeployHistoryLedger<H>,
}

impl<R: CommandExecutor, H: HistoryRepository> HistoryQuery<R, H> {
    pub fn new(remote: R, history: H) -> Self {
        Self {
            remote,
            ledger: DeployHistoryLedger::new(history),
        }
    }

    /// Newest `limit` deploys of `repo_dir`.
    ///
    /// `home` defaults to the login directory of the target.
    pub fn show_commits(
        &self,
        ctx: &DeployContext,
        repo_dir: &str,
        limit: usize,
        home: Option<&str>,
    ) -> DeployResult<Vec<DeployRecord>> {
        let home = match home {
            Some(home) => home.to_string(),
            None => ctx.remote_home(&self.remote)?.to_string(),
        };
        let history = self.ledger.load(&history_path(&home));
        match history.repo_history(repo_dir) {
            Some(records) if !records.is_empty() => {
                Ok(records.iter().take(limit).cloned().collect())
            }
            _ => Err(DeployError::NoHistory {
                repo_dir: repo_dir.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ledger::record_commit;
    use crate::application::testing::{InMemoryHistory, RecordingExecutor};
    use crate::domain::entities::{CommitInfo, DeployHistory, DeploySource};
    use crate::domain::value_objects::HostIdentity;
    use chrono::{TimeZone, Utc};

    const PATH: &str = "/home/deploy/.deploy/git/history.yml";

    fn history_with(count: usize) -> DeployHistory {
        let mut history = DeployHistory::new();
        for i in 0..count {
            let commit = CommitInfo {
                hash: format!("{:040x}", i),
                author: "Jane Doe <jane@example.com>".to_string(),
                authored_date: chrono::DateTime::parse_from_rfc3339("2024-03-05T14:07:31+02:00")
                    .unwrap(),
                title: format!("change {}", i),
                message_body: vec![],
            };
            record_commit(
                &mut history,
                "app",
                commit,
                DeploySource::new("https://example/app.git", "main", "app"),
                Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap() + chrono::Duration::minutes(i as i64),
            );
        }
        history
    }

    fn ctx() -> DeployContext {
        DeployContext::new(HostIdentity::new("deploy", "web1", 22), "alice", "/tmp")
    }

    #[test]
    fn newest_records_up_to_limit() {
        let remote = RecordingExecutor::new().respond("pwd", "/home/deploy");
        let query = HistoryQuery::new(&remote, InMemoryHistory::new().with_file(PATH, history_with(12)));

        let records = query.show_commits(&ctx(), "app", DEFAULT_LIMIT, None).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].commit.title, "change 11");
    }

    #[test]
    fn missing_history_is_an_error() {
        let remote = RecordingExecutor::new();
        let query = HistoryQuery::new(&remote, InMemoryHistory::new());
        let err = query
            .show_commits(&ctx(), "app", DEFAULT_LIMIT, Some("/home/deploy"))
            .unwrap_err();
        assert!(matches!(err, DeployError::NoHistory { .. }));
        assert!(remote.commands().is_empty());
    }

    #[test]
    fn unknown_repo_dir_is_an_error() {
        let remote = RecordingExecutor::new();
        let query = HistoryQuery::new(&remote, InMemoryHistory::new().with_file(PATH, history_with(1)));
        assert!(query
            .show_commits(&ctx(), "api", DEFAULT_LIMIT, Some("/home/deploy"))
            .is_err());
    }
}
