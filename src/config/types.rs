//! Configuration types

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::DeployResult;

use super::loader;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Mirror (rsync) deploy defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Target home; the login directory when unset
    pub home: Option<String>,
    pub base_dir: String,
    pub refspec: String,
    pub save_history: bool,
    pub delete_extraneous: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            home: None,
            base_dir: "git".to_string(),
            refspec: "master".to_string(),
            save_history: false,
            delete_extraneous: true,
        }
    }
}

/// Push-hook deploy defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub dest_base_path: String,
    pub branch: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            dest_base_path: "opt".to_string(),
            branch: "master".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub port: u16,
    /// Login user on targets; the local user when unset
    pub user: Option<String>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            port: crate::domain::value_objects::DEFAULT_SSH_PORT,
            user: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InteractiveConfig {
    /// Seconds to wait for output matching a prompt
    pub timeout_secs: u64,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self { timeout_secs: 1800 }
    }
}

/// gitship configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Root for local staging clones; the system temp dir when unset
    #[serde(default)]
    pub local_tmpdir: Option<PathBuf>,

    #[serde(default)]
    pub mirror: MirrorConfig,

    #[serde(default)]
    pub push: PushConfig,

    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub interactive: InteractiveConfig,

    /// Only ever set from the environment
    #[serde(skip)]
    pub ssh_password: Option<SecretString>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DeployResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Explicit file, `./gitship.toml`, user config, or defaults
    pub fn discover(explicit: Option<&Path>) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::discover(explicit)
    }

    /// Apply environment variable overrides (GITSHIP_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Staging temp root
    pub fn tmpdir(&self) -> PathBuf {
        self.local_tmpdir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
