//! Domain Entities
//!
//! - `CommitInfo` - Metadata of one deployed revision
//! - `DeployRecord` - One completed deploy
//! - `DeployHistory` - Deploy records per repository directory

mod commit;
mod history;

pub use commit::{parse_git_date, CommitInfo, CommitLogError};
pub use history::{DeployHistory, DeployRecord, DeploySource, RecordOutcome, HISTORY_VERSION};
