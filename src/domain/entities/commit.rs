//! Commit entity - the metadata of one deployed revision.
//!
//! Parsed from `git log -n1 --pretty=fuller`, which looks like:
//!
//! ```text
//! commit 0a1b2c...
//! Merge: 1111111 2222222          (merge commits only)
//! Author:     Jane Doe <jane@example.com>
//! AuthorDate: Tue Mar 5 14:07:31 2024 +0200
//! Commit:     Jane Doe <jane@example.com>
//! CommitDate: Tue Mar 5 14:07:31 2024 +0200
//!
//!     Title line
//!
//!     Body line one
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// git indents subject and body lines by four spaces
const MESSAGE_INDENT: &str = "    ";

/// Default `git log` date format, e.g. `Tue Mar 5 14:07:31 2024 +0200`
const GIT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommitLogError {
    #[error("commit log is empty")]
    Empty,

    #[error("expected 'commit <hash>' on the first line, found '{line}'")]
    MissingHash { line: String },

    #[error("missing '{field}:' line in commit log")]
    MissingField { field: &'static str },

    #[error("unparsable author date '{raw}'")]
    InvalidDate { raw: String },

    #[error("commit log has no title line")]
    MissingTitle,
}

/// Metadata of a single commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub authored_date: DateTime<FixedOffset>,
    pub title: String,
    #[serde(default)]
    pub message_body: Vec<String>,
}

impl CommitInfo {
    /// Parse the output of `git log -n1 --pretty=fuller`.
    pub fn parse_fuller(log: &str) -> Result<Self, CommitLogError> {
        let mut lines = log.lines();

        let first = lines.next().ok_or(CommitLogError::Empty)?;
        let hash = match first.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["commit", hash, ..] => hash.to_string(),
            _ => {
                return Err(CommitLogError::MissingHash {
                    line: first.to_string(),
                })
            }
        };

        let mut next = lines.next();
        if next.is_some_and(|l| l.starts_with("Merge")) {
            next = lines.next();
        }

        let author = header_value(next, "Author")?;
        let raw_date = header_value(lines.next(), "AuthorDate")?;
        let authored_date = parse_git_date(&raw_date)?;

        // Commit:, CommitDate:, and the blank separator
        for _ in 0..3 {
            lines.next();
        }

        let title = lines
            .next()
            .map(strip_indent)
            .ok_or(CommitLogError::MissingTitle)?;

        // blank line between title and body
        lines.next();
        let message_body = lines.map(strip_indent).collect();

        Ok(Self {
            hash,
            author,
            authored_date,
            title,
            message_body,
        })
    }

    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

fn header_value(line: Option<&str>, field: &'static str) -> Result<String, CommitLogError> {
    line.and_then(|l| l.strip_prefix(field))
        .and_then(|rest| rest.strip_prefix(':'))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(CommitLogError::MissingField { field })
}

fn strip_indent(line: &str) -> String {
    line.strip_prefix(MESSAGE_INDENT).unwrap_or(line).to_string()
}

/// Parse a git author date, keeping its UTC offset.
pub fn parse_git_date(raw: &str) -> Result<DateTime<FixedOffset>, CommitLogError> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    DateTime::parse_from_str(&normalized, GIT_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(&normalized))
        .or_else(|_| DateTime::parse_from_rfc3339(&normalized))
        .map_err(|_| CommitLogError::InvalidDate {
            raw: raw.to_string(),
        })
}
