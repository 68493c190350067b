//! Output Rendering
//!
//! Turns use case reports into the single-line "OK" confirmation (plus a
//! few detail lines) or a JSON event for scripting.

use serde_json::json;

use crate::application::{BootstrapOutcome, MirrorReport, PushReport, RemoteUpdate};
use crate::domain::entities::{DeployRecord, RecordOutcome};

/// `gitship::<operation>(<args>): OK`
pub fn ok_line(operation: &str, args: &[&str]) -> String {
    format!("gitship::{}({}): OK", operation, args.join(", "))
}

pub fn render_mirror(report: &MirrorReport, repo_dir: &str, refspec: &str) -> String {
    let commit = &report.record.commit;
    let mut out = ok_line("mirror", &[repo_dir, refspec]);
    out.push_str(&format!("\n  deployed {} to {}", commit.short_hash(), report.destination));
    out.push_str(&format!("\n  commit   {} {}", commit.short_hash(), commit.title));
    if report.outcome == RecordOutcome::Refreshed {
        out.push_str("\n  (unchanged since the last recorded deploy)");
    }
    if let Some(persisted) = &report.persisted {
        out.push_str(&format!(
            "\n  history  generation {}{}",
            persisted.generation,
            if persisted.overwrote_concurrent {
                " (overwrote a concurrent update)"
            } else {
                ""
            }
        ));
    }
    if !report.staging.pruned.is_empty() {
        out.push_str(&format!(
            "\n  pruned   {}",
            report.staging.pruned.join(", ")
        ));
    }
    out
}

pub fn mirror_json(report: &MirrorReport, repo_dir: &str, refspec: &str) -> serde_json::Value {
    json!({
        "event": "ok",
        "command": "mirror",
        "repo_dir": repo_dir,
        "refspec": refspec,
        "destination": report.destination,
        "commit": report.record.commit,
        "new_commit": report.is_new_commit(),
        "history_generation": report.persisted.map(|p| p.generation),
        "pruned": report.staging.pruned,
    })
}

pub fn render_push(report: &PushReport, dest_name: &str, branch: &str) -> String {
    let bootstrap = match report.bootstrap {
        BootstrapOutcome::Existing => "existing",
        BootstrapOutcome::Created => "created",
        BootstrapOutcome::Rebuilt => "rebuilt after an interrupted bootstrap",
    };
    let mut out = ok_line("push", &[dest_name, branch]);
    out.push_str(&format!("\n  checkout {}", report.worktree));
    out.push_str(&format!("\n  bare     {} ({})", report.bare_repo, bootstrap));
    if report.remote == RemoteUpdate::Updated {
        out.push_str("\n  remote 'dest' was repointed");
    }
    out
}

pub fn push_json(report: &PushReport, dest_name: &str, branch: &str) -> serde_json::Value {
    json!({
        "event": "ok",
        "command": "push",
        "dest_name": dest_name,
        "branch": branch,
        "worktree": report.worktree,
        "bare_repo": report.bare_repo,
        "bootstrap": format!("{:?}", report.bootstrap).to_lowercase(),
        "remote": format!("{:?}", report.remote).to_lowercase(),
    })
}

/// Deploy records as YAML, newest first
pub fn render_history(records: &[DeployRecord]) -> Result<String, serde_yaml_ng::Error> {
    serde_yaml_ng::to_string(records)
}
