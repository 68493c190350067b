//! Command Executors
//!
//! Concrete implementations of the CommandExecutor port.

mod local;
mod ssh;

pub use local::LocalShell;
pub use ssh::SshExecutor;
