//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::debug;

use crate::error::{DeployError, DeployResult};

use super::types::{Config, ConfigWarning};

/// File looked up in the working directory
pub const PROJECT_CONFIG: &str = "gitship.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the configuration file and load it with env overrides applied.
///
/// An explicit path must exist; the implicit locations are optional.
pub fn discover(explicit: Option<&Path>) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => std::iter::once(PathBuf::from(PROJECT_CONFIG))
            .chain(dirs::config_dir().map(|d| d.join("gitship/config.toml")))
            .collect(),
    };

    for candidate in candidates {
        if explicit.is_some() || candidate.exists() {
            debug!("loading configuration from {}", candidate.display());
            let (config, warnings) = load_with_warnings(&candidate)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (GITSHIP_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    // GITSHIP_TMPDIR
    if let Some(dir) = var("GITSHIP_TMPDIR").filter(|d| !d.is_empty()) {
        config.local_tmpdir = Some(PathBuf::from(dir));
    }

    // GITSHIP_SAVE_HISTORY
    if let Some(val) = var("GITSHIP_SAVE_HISTORY") {
        config.mirror.save_history = parse_flag(&val);
    }

    // GITSHIP_DELETE_EXTRANEOUS
    if let Some(val) = var("GITSHIP_DELETE_EXTRANEOUS") {
        config.mirror.delete_extraneous = parse_flag(&val);
    }

    // GITSHIP_INTERACTIVE_TIMEOUT (seconds)
    if let Some(secs) = var("GITSHIP_INTERACTIVE_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
        config.interactive.timeout_secs = secs;
    }

    // GITSHIP_SSH_PASSWORD
    if let Some(password) = var("GITSHIP_SSH_PASSWORD").filter(|p| !p.is_empty()) {
        config.ssh_password = Some(SecretString::from(password));
    }

    config
}

fn parse_flag(val: &str) -> bool {
    !matches!(val.trim().to_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "local_tmpdir",
        "mirror",
        "home",
        "base_dir",
        "refspec",
        "save_history",
        "delete_extraneous",
        "push",
        "dest_base_path",
        "branch",
        "ssh",
        "port",
        "user",
        "interactive",
        "timeout_secs",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
