//! YAML History Repository
//!
//! Implements the HistoryRepository port on top of any `CommandExecutor`,
//! so the same code reads and writes the history file on a target host
//! (over ssh) or locally (in tests). Writes go to `<path>.tmp` first and
//! are renamed into place.

use crate::domain::entities::{DeployHistory, HISTORY_VERSION};
use crate::domain::ports::{
    CommandExecutor, CommandRequest, ExecError, HistoryRepository, HistoryStoreError,
};
use crate::domain::value_objects::shell_quote;

/// History file stored as YAML wherever `exec` runs
pub struct YamlHistoryRepository<E> {
    exec: E,
}

impl<E: CommandExecutor> YamlHistoryRepository<E> {
    pub fn new(exec: E) -> Self {
        Self { exec }
    }

    /// Render a history the way it is written to disk
    pub fn render(history: &DeployHistory) -> Result<String, HistoryStoreError> {
        serde_yaml_ng::to_string(history).map_err(|e| HistoryStoreError::Serialization {
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &str) -> Result<bool, HistoryStoreError> {
        let command = format!("test -e {}", shell_quote(path));
        let output = self.exec.execute(&CommandRequest::new(command.as_str()))?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => Err(ExecError::Failed {
                command,
                code,
                stderr: output.stderr,
            }
            .into()),
        }
    }
}

impl<E: CommandExecutor> HistoryRepository for YamlHistoryRepository<E> {
    fn load(&self, path: &str) -> Result<Option<DeployHistory>, HistoryStoreError> {
        if !self.exists(path)? {
            return Ok(None);
        }

        let content = self.exec.run(&format!("cat {}", shell_quote(path)))?;
        let history: DeployHistory =
            serde_yaml_ng::from_str(&content).map_err(|e| HistoryStoreError::Corrupted {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if history.version() != HISTORY_VERSION {
            return Err(HistoryStoreError::VersionMismatch {
                path: path.to_string(),
                found: history.version(),
                expected: HISTORY_VERSION,
            });
        }

        Ok(Some(history))
    }

    fn save(&self, history: &DeployHistory, path: &str) -> Result<(), HistoryStoreError> {
        let content = Self::render(history)?;
        let tmp = format!("{}.tmp", path);

        let mut command = String::new();
        if let Some((dir, _)) = path.rsplit_once('/') {
            if !dir.is_empty() {
                command.push_str(&format!("mkdir -p {} && ", shell_quote(dir)));
            }
        }
        command.push_str(&format!(
            "cat > {tmp} && mv -f {tmp} {dest}",
            tmp = shell_quote(&tmp),
            dest = shell_quote(path)
        ));

        self.exec.run_with_input(&command, &content)?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::entities::{CommitInfo, DeploySource};
    use crate::infrastructure::exec::LocalShell;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn sample_history() -> DeployHistory {
        let mut history = DeployHistory::new();
        let commit = CommitInfo {
            hash: "0a1b2c3d4e5f".to_string(),
            author: "Jane Doe <jane@example.com>".to_string(),
            authored_date: chrono::DateTime::parse_from_rfc3339("2024-03-05T14:07:31+02:00")
                .unwrap(),
            title: "Fix the thing".to_string(),
            message_body: vec!["Longer explanation.".to_string()],
        };
        history.record(
            "app",
            commit,
            DeploySource::new("https://example/app.git", "main", "app"),
            Utc.with_ymd_and_hms(2024, 3, 5, 12, 10, 0).unwrap(),
        );
        history
    }

    fn path_in(dir: &std::path::Path, rel: &str) -> String {
        dir.join(rel).to_string_lossy().into_owned()
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        let repo = YamlHistoryRepository::new(LocalShell::new());
        assert_eq!(repo.load(&path_in(dir.path(), "history.yml")).unwrap(), None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = path_in(dir.path(), ".deploy/git/history.yml");
        let repo = YamlHistoryRepository::new(LocalShell::new());

        let history = sample_history();
        repo.save(&history, &path).unwrap();

        assert_eq!(repo.load(&path).unwrap(), Some(history));
        assert!(!dir.path().join(".deploy/git/history.yml.tmp").exists());
    }

    #[test]
    fn saved_file_is_human_readable_yaml() {
        let dir = tempdir().unwrap();
        let path = path_in(dir.path(), "history.yml");
        YamlHistoryRepository::new(LocalShell::new())
            .save(&sample_history(), &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("version: 1"));
        assert!(content.contains("https://example/app.git"));
        assert!(content.contains("2024-03-05T14:07:31+02:00"));
    }

    #[test]
    fn paths_with_spaces_survive_quoting() {
        let dir = tempdir().unwrap();
        let path = path_in(dir.path(), "deploy home/it's/history.yml");
        let repo = YamlHistoryRepository::new(LocalShell::new());
        repo.save(&sample_history(), &path).unwrap();
        assert!(repo.load(&path).unwrap().is_some());
    }

    #[test]
    fn garbage_is_reported_as_corrupted() {
        let dir = tempdir().unwrap();
        let path = path_in(dir.path(), "history.yml");
        std::fs::write(&path, "repos: [unclosed").unwrap();

        let err = YamlHistoryRepository::new(LocalShell::new())
            .load(&path)
            .unwrap_err();
        assert!(matches!(err, HistoryStoreError::Corrupted { .. }));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let path = path_in(dir.path(), "history.yml");
        std::fs::write(&path, "version: 99\ngeneration: 0\nrepos: {}\n").unwrap();

        let err = YamlHistoryRepository::new(LocalShell::new())
            .load(&path)
            .unwrap_err();
        assert_eq!(
            err,
            HistoryStoreError::VersionMismatch {
                path,
                found: 99,
                expected: HISTORY_VERSION
            }
        );
    }
}
