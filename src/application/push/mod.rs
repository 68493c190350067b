//! Push Module
//!
//! Deploys by `git push` into a hidden bare repository on the target whose
//! post-receive hook checks the pushed tree out into the destination.
//!
//! ## Structure
//!
//! - `options` - Request type (`PushRequest`)
//! - `result` - Result types (`PushReport`, `BootstrapOutcome`, `RemoteUpdate`)
//! - `bootstrap` - Bare repository bootstrap on the target
//! - `use_case` - Orchestration (`PushHookSync`)

mod bootstrap;
mod options;
mod result;
mod use_case;

pub use bootstrap::{BareRepoBootstrap, BOOTSTRAP_MARKER};
pub use options::PushRequest;
pub use result::{BootstrapOutcome, PushReport, RemoteUpdate};
pub use use_case::PushHookSync;
