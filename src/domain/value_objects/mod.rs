//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod host;
mod shell;

pub use host::{HostIdentity, DEFAULT_SSH_PORT};
pub use shell::{shell_quote, shell_quote_path};
