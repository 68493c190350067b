//! Configuration module for gitship
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (GITSHIP_*)
//! 3. `--config <path>`, else `./gitship.toml`, else `<config_dir>/gitship/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::PROJECT_CONFIG;
pub use types::{
    Config, ConfigWarning, InteractiveConfig, MirrorConfig, PushConfig, SshConfig,
};
