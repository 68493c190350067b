//! Property tests for deploy history bookkeeping.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

use gitship::domain::entities::{DeploySource, RecordOutcome};
use gitship::{CommitInfo, DeployHistory};

fn commit(hash: &str) -> CommitInfo {
    CommitInfo {
        hash: hash.to_string(),
        author: "Jane Doe <jane@example.com>".to_string(),
        authored_date: DateTime::<FixedOffset>::parse_from_rfc3339("2024-03-05T14:07:31+02:00")
            .unwrap(),
        title: format!("commit {hash}"),
        message_body: vec![],
    }
}

fn source() -> DeploySource {
    DeploySource::new("https://example/app.git", "main", "app")
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn hash() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9a-f]{40}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: redeploying the head commit never grows the history.
    #[test]
    fn property_redeploy_does_not_grow(h in hash(), repeats in 1usize..8) {
        let mut history = DeployHistory::new();
        history.record("app", commit(&h), source(), at(0));

        for i in 0..repeats {
            let (outcome, record) = history.record("app", commit(&h), source(), at(i as i64 + 1));
            prop_assert_eq!(outcome, RecordOutcome::Refreshed);
            prop_assert_eq!(record.timestamp, at(i as i64 + 1));
        }
        prop_assert_eq!(history.repo_history("app").unwrap().len(), 1);
    }

    /// PROPERTY: distinct commits are kept newest first.
    #[test]
    fn property_distinct_commits_newest_first(
        hashes in proptest::collection::hash_set(hash(), 1..12)
    ) {
        let hashes: Vec<String> = hashes.into_iter().collect();
        let mut history = DeployHistory::new();
        for (i, h) in hashes.iter().enumerate() {
            history.record("app", commit(h), source(), at(i as i64));
        }

        let records = history.repo_history("app").unwrap();
        prop_assert_eq!(records.len(), hashes.len());
        let stored: Vec<&str> = records.iter().map(|r| r.commit.hash.as_str()).collect();
        let expected: Vec<&str> = hashes.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(stored, expected);
    }

    /// PROPERTY: a history survives the YAML file format unchanged.
    #[test]
    fn property_yaml_round_trip(
        deploys in proptest::collection::vec((0usize..3, hash()), 0..10),
        generation_bumps in 0u64..4,
    ) {
        let dirs = ["app", "api", "docs site"];
        let mut history = DeployHistory::new();
        for (i, (dir, h)) in deploys.iter().enumerate() {
            history.record(dirs[*dir], commit(h), source(), at(i as i64));
        }
        for _ in 0..generation_bumps {
            history.bump_generation();
        }

        let yaml = serde_yaml_ng::to_string(&history).unwrap();
        let back: DeployHistory = serde_yaml_ng::from_str(&yaml).unwrap();
        prop_assert_eq!(back, history);
    }
}
