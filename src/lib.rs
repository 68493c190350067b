//! gitship - deploy git revisions to remote hosts
//!
//! Two deploy strategies share one set of ports:
//!
//! - mirror: refresh a local staging clone, copy it with rsync, and keep a
//!   deploy history ledger on the target
//! - push: push a branch into a bare repository on the target whose
//!   post-receive hook checks it out

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::{DeployContext, HistoryQuery, MirrorSync, PushHookSync};
pub use config::Config;
pub use domain::entities::{CommitInfo, DeployHistory, DeployRecord};
pub use domain::value_objects::HostIdentity;
pub use error::{DeployError, DeployResult};
