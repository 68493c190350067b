//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `exec/` - Command executors (LocalShell, SshExecutor)
//! - `interactive/` - Prompt-driven subprocesses on a pseudo-terminal
//! - `repositories/` - Repository implementations (YAML deploy history)

pub mod exec;
pub mod interactive;
pub mod repositories;

pub use exec::{LocalShell, SshExecutor};
pub use interactive::PtyRunner;
pub use repositories::YamlHistoryRepository;
