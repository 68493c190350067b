//! Application Layer
//!
//! Use cases that orchestrate the deploy flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT talk to hosts or subprocesses directly; every effect goes
//!   through a port
//!
//! ## Use Cases
//!
//! - `MirrorSync` - Staging clone + rsync + deploy history
//! - `PushHookSync` - Local clone + bare repository bootstrap + git push
//! - `CheckoutGuard` - Up-to-date / clean checks on a local checkout
//! - `HistoryQuery` - Recent deploys recorded on a target
//!
//! ## Services
//!
//! - `LocalStagingManager` - Fresh local clones per target
//! - `DeployHistoryLedger` - Load, record and persist deploy history

pub mod checkout_guard;
pub mod context;
pub mod history_query;
pub mod ledger;
pub mod mirror;
pub mod push;
pub mod staging;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout_guard::CheckoutGuard;
pub use context::{remote_join, DeployContext, DEFAULT_INTERACTIVE_TIMEOUT};
pub use history_query::{HistoryQuery, DEFAULT_LIMIT};
pub use ledger::{history_path, record_commit, record_deploy, DeployHistoryLedger, PersistOutcome};
pub use mirror::{MirrorOptions, MirrorReport, MirrorRequest, MirrorSync};
pub use push::{BootstrapOutcome, PushHookSync, PushReport, PushRequest, RemoteUpdate};
pub use staging::{LocalStagingManager, StagingClone};
